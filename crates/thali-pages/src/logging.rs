//! Logging macros for thali-pages
//!
//! Thin wrappers that keep call sites identical across targets: on native
//! targets they forward to `tracing`, on wasm32 they write to the browser
//! console.
//!
//! | Macro | Condition | WASM | Non-WASM |
//! |-------|-----------|------|----------|
//! | `debug_log!` | `debug-hooks` feature | `console.debug` | `tracing::debug!` |
//! | `info_log!` | always | `console.info` | `tracing::info!` |
//! | `warn_log!` | always | `console.warn` | `tracing::warn!` |
//! | `error_log!` | always | `console.error` | `tracing::error!` |
//!
//! Structured fields are only available through `tracing` directly; the
//! internals of this crate use `tracing` for anything with fields.

/// Logs a debug message (requires the `debug-hooks` feature)
#[macro_export]
#[cfg(all(feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires the `debug-hooks` feature)
#[macro_export]
#[cfg(all(feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		::tracing::debug!("{}", format!($($arg)*));
	}};
}

/// No-op debug_log without the `debug-hooks` feature
#[macro_export]
#[cfg(not(feature = "debug-hooks"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! info_log {
	($($arg:tt)*) => {{
		web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		::tracing::info!("{}", format!($($arg)*));
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		::tracing::warn!("{}", format!($($arg)*));
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		::tracing::error!("{}", format!($($arg)*));
	}};
}
