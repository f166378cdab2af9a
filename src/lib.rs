//! Voice command core for a retail billing assistant
//!
//! Turns spoken shop-counter commands ("add tomato 2 kg 50", "remove rice",
//! "what is the total") into structured intents, and applies them to a running
//! bill with optional spoken feedback.

pub mod types;
pub mod error;
pub mod config;
pub mod entities;
pub mod matcher;
pub mod speech;
pub mod billing;
pub mod session;
pub mod context;
pub mod dispatcher;

pub use types::*;
pub use error::*;
pub use config::*;
pub use entities::*;
pub use matcher::*;
pub use speech::*;
pub use billing::*;
pub use session::*;
pub use context::*;
pub use dispatcher::*;

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn voicebill_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyIntentMatcher>()?;
    m.add_class::<PyVoiceBill>()?;
    m.add_function(wrap_pyfunction!(py_parse_command, m)?)?;
    m.add_function(wrap_pyfunction!(py_normalize_unit, m)?)?;
    Ok(())
}
