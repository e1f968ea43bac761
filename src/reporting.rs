//! # Reporting Module / 报告模块
//!
//! This module summarizes a completed run on the console and, optionally, as
//! a standalone HTML page. The per-feature BDD reports themselves are written
//! by the scenario engine to the rewritten report paths.
//!
//! 此模块在控制台上汇总已完成的运行，并可选地生成独立的 HTML 页面。
//! 每个 feature 的 BDD 报告本身由场景引擎写入重写后的报告路径。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
