pub mod evaluate;
pub mod report;
pub mod scan;

pub use evaluate::{evaluate_account, AccountReading, AccountReport, ScanOutcome, Thresholds};
pub use report::{ReportRow, ReportTable};
pub use scan::Scanner;
