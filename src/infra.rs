//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Parallel Features,
//! including feature file discovery, child process execution, and i18n support.
//!
//! 此模块为 Parallel Features 提供基础设施服务，
//! 包括 feature 文件发现、子进程执行和国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
