/// How cells that cannot be coerced to the requested type are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionPolicy {
    /// Unparsable dates become absent and unparsable numbers zero; both are logged.
    #[default]
    Lenient,
    /// Unparsable values abort parsing with `ParseError::InvalidValue`.
    Strict,
}

/// How repeated identifiers within one metadata section are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The last row with a given id replaces earlier ones.
    #[default]
    LastWins,
    /// A repeated id aborts parsing with `ParseError::DuplicateId`.
    Reject,
}

/// Which sheets are scanned for invoices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// Every sheet except the root sheet, in workbook order.
    #[default]
    AllExceptRoot,
    /// Exactly these sheets; a missing one is an error.
    Named(Vec<String>),
}

/// Parser configuration.
///
/// ```
/// use invoice_sheets::core::*;
///
/// let options = ParseOptions::new()
///     .root_sheet("CONFIG")
///     .data_sheet("2026")
///     .coercion(CoercionPolicy::Strict);
/// assert_eq!(options.root_sheet, "CONFIG");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the metadata sheet.
    pub root_sheet: String,
    pub data_sheets: SheetSelection,
    /// Zero-based column holding section markers on the root sheet.
    pub marker_column: usize,
    /// Literal removed from monetary cells before parsing (e.g. "CZK").
    pub currency_marker: String,
    /// Currency written into payment codes.
    pub currency: String,
    pub coercion: CoercionPolicy,
    pub duplicate_ids: DuplicatePolicy,
    /// Compute the payment code of every parsed invoice.
    pub payment_codes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            root_sheet: "ROOT".to_string(),
            data_sheets: SheetSelection::AllExceptRoot,
            marker_column: 1,
            currency_marker: "CZK".to_string(),
            currency: "CZK".to_string(),
            coercion: CoercionPolicy::Lenient,
            duplicate_ids: DuplicatePolicy::LastWins,
            payment_codes: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_sheet(mut self, name: impl Into<String>) -> Self {
        self.root_sheet = name.into();
        self
    }

    /// Scan the named sheet for invoices. Switches the selection to named sheets.
    pub fn data_sheet(mut self, name: impl Into<String>) -> Self {
        match &mut self.data_sheets {
            SheetSelection::Named(names) => names.push(name.into()),
            SheetSelection::AllExceptRoot => {
                self.data_sheets = SheetSelection::Named(vec![name.into()]);
            }
        }
        self
    }

    pub fn marker_column(mut self, column: usize) -> Self {
        self.marker_column = column;
        self
    }

    pub fn currency_marker(mut self, marker: impl Into<String>) -> Self {
        self.currency_marker = marker.into();
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn coercion(mut self, policy: CoercionPolicy) -> Self {
        self.coercion = policy;
        self
    }

    pub fn duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }

    pub fn payment_codes(mut self, enabled: bool) -> Self {
        self.payment_codes = enabled;
        self
    }
}
