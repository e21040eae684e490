//! SPDX-License-Identifier: GPL-3.0-or-later

pub mod classify;
pub mod frame;
pub mod luminance;
pub mod report;
pub mod session;
pub mod source;
pub mod telemetry;
pub mod window;

mod tests;
