//! Process-lifetime report storage.
//!
//! Reports live in memory only and vanish when the process exits. The
//! adapter is constructed once at startup and shared with the report
//! service; there is no global instance.

mod in_memory_report_repository;

pub use in_memory_report_repository::InMemoryReportRepository;
