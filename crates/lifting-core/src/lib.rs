pub mod nodeset;
pub mod relation;
pub mod pattern;
pub mod codes;
pub mod powerset;
pub mod nfa;
pub mod cayley;
pub mod arc_consistency;
pub mod sat;
pub mod lifting;
pub mod construction;
pub mod check;
pub mod error;
#[cfg(feature = "python")]
pub mod py;

pub use check::{check, CheckConfig, Certificate, Outcome};
pub use error::{LiftingError, Result};
pub use lifting::{iterate_lifting, LiftingConfig, LiftingOutcome, LiftingReport};
pub use pattern::{Color, Pattern};
pub use relation::Relation;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn lifting_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py::RustPattern>()?;
    m.add_class::<py::CheckResult>()?;
    m.add_function(wrap_pyfunction!(py::check, m)?)?;
    m.add_function(wrap_pyfunction!(py::is_normal_form, m)?)?;
    m.add_function(wrap_pyfunction!(py::first_path_condition, m)?)?;
    m.add_function(wrap_pyfunction!(py::second_path_condition, m)?)?;
    m.add_function(wrap_pyfunction!(py::third_path_condition, m)?)?;
    m.add_function(wrap_pyfunction!(py::cofinite_path_condition, m)?)?;
    m.add_function(wrap_pyfunction!(py::is_construction_deterministic, m)?)?;
    Ok(())
}
