//! Document variants and the FFD document kind catalogue

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document type identified by its nesting key path and `code` literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVariant {
    /// Document type name (schema file stem), e.g. `closeShift`
    pub name: String,
    /// Keys leading from the payload root to the document body
    pub key_path: Vec<String>,
    /// Discriminant value the body must carry
    pub code: i64,
}

impl DocumentVariant {
    /// Create a new variant
    pub fn new(name: impl Into<String>, key_path: Vec<String>, code: i64) -> Self {
        Self {
            name: name.into(),
            key_path,
            code,
        }
    }

    /// Known FFD kind for this variant's code
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_code(self.code)
    }

    /// Key path joined with dots, e.g. `document.closeShift`
    pub fn dotted_path(&self) -> String {
        self.key_path.join(".")
    }
}

impl fmt::Display for DocumentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.code)
    }
}

/// Fiscal document kinds defined by the fiscal data format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    FiscalReport,
    OpenShift,
    Receipt,
    Bso,
    CloseShift,
    CloseArchive,
    OperatorAck,
    FiscalReportCorrection,
    CurrentStateReport,
    ReceiptCorrection,
    BsoCorrection,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 11] = [
        DocumentKind::FiscalReport,
        DocumentKind::OpenShift,
        DocumentKind::Receipt,
        DocumentKind::Bso,
        DocumentKind::CloseShift,
        DocumentKind::CloseArchive,
        DocumentKind::OperatorAck,
        DocumentKind::FiscalReportCorrection,
        DocumentKind::CurrentStateReport,
        DocumentKind::ReceiptCorrection,
        DocumentKind::BsoCorrection,
    ];

    /// Look up a kind by its document code
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Document code carried in the `code` field
    pub fn code(&self) -> i64 {
        match self {
            DocumentKind::FiscalReport => 1,
            DocumentKind::OpenShift => 2,
            DocumentKind::Receipt => 3,
            DocumentKind::Bso => 4,
            DocumentKind::CloseShift => 5,
            DocumentKind::CloseArchive => 6,
            DocumentKind::OperatorAck => 7,
            DocumentKind::FiscalReportCorrection => 11,
            DocumentKind::CurrentStateReport => 21,
            DocumentKind::ReceiptCorrection => 31,
            DocumentKind::BsoCorrection => 41,
        }
    }

    /// Conventional JSON key of the document body
    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::FiscalReport => "fiscalReport",
            DocumentKind::OpenShift => "openShift",
            DocumentKind::Receipt => "receipt",
            DocumentKind::Bso => "bso",
            DocumentKind::CloseShift => "closeShift",
            DocumentKind::CloseArchive => "closeArchive",
            DocumentKind::OperatorAck => "operatorAck",
            DocumentKind::FiscalReportCorrection => "fiscalReportCorrection",
            DocumentKind::CurrentStateReport => "currentStateReport",
            DocumentKind::ReceiptCorrection => "receiptCorrection",
            DocumentKind::BsoCorrection => "bsoCorrection",
        }
    }

    /// Official document title
    pub fn description(&self) -> &'static str {
        match self {
            DocumentKind::FiscalReport => "Отчёт о фискализации",
            DocumentKind::OpenShift => "Отчёт об открытии смены",
            DocumentKind::Receipt => "Кассовый чек",
            DocumentKind::Bso => "Бланк строгой отчётности",
            DocumentKind::CloseShift => "Отчёт о закрытии смены",
            DocumentKind::CloseArchive => "Отчёт о закрытии фискального накопителя",
            DocumentKind::OperatorAck => "Подтверждение оператора",
            DocumentKind::FiscalReportCorrection => "Отчёт об изменении параметров регистрации",
            DocumentKind::CurrentStateReport => "Отчёт о текущем состоянии расчётов",
            DocumentKind::ReceiptCorrection => "Кассовый чек коррекции",
            DocumentKind::BsoCorrection => "Бланк строгой отчётности коррекции",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
