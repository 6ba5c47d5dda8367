use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use num_bigint::BigUint;
use crate::cayley::CayleyGraph;
use crate::check::{CheckConfig, Outcome};
use crate::error::LiftingError;
use crate::lifting::LiftingConfig;
use crate::pattern::{Color, Pattern};
use crate::{codes, construction, nfa};

impl From<LiftingError> for PyErr {
    fn from(err: LiftingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn check_edges(n: usize, edges: &[(usize, usize)]) -> PyResult<()> {
    match edges.iter().find(|&&(x, y)| x >= n || y >= n) {
        Some(&(x, y)) => Err(PyValueError::new_err(format!(
            "edge {x} -> {y} is outside a {n}-node pattern"
        ))),
        None => Ok(()),
    }
}

/// Python-visible pattern. Node ids are `0..num_nodes()`.
#[pyclass(name = "Pattern")]
#[derive(Clone)]
pub struct RustPattern {
    pub(crate) inner: Pattern,
}

#[pymethods]
impl RustPattern {
    #[new]
    #[pyo3(signature = (num_nodes, green=Vec::new(), red=Vec::new()))]
    fn new(num_nodes: usize, green: Vec<(usize, usize)>, red: Vec<(usize, usize)>) -> PyResult<Self> {
        check_edges(num_nodes, &green)?;
        check_edges(num_nodes, &red)?;
        Ok(RustPattern {
            inner: Pattern::from_edge_lists(num_nodes, &green, &red),
        })
    }

    #[staticmethod]
    fn from_code(n: usize, code: BigUint) -> PyResult<Self> {
        Ok(RustPattern {
            inner: codes::decode(n, &code)?,
        })
    }

    fn to_code(&self) -> (usize, BigUint) {
        codes::encode(&self.inner)
    }

    fn num_nodes(&self) -> usize {
        self.inner.num_nodes()
    }

    fn generation(&self) -> u32 {
        self.inner.generation()
    }

    /// `(nodes, green edges, red edges)`
    fn size(&self) -> (usize, usize, usize) {
        self.inner.size()
    }

    fn green_edges(&self) -> Vec<(usize, usize)> {
        self.inner.green().edges().collect()
    }

    fn red_edges(&self) -> Vec<(usize, usize)> {
        self.inner.red().edges().collect()
    }

    fn has_green_edge(&self, x: usize, y: usize) -> bool {
        x < self.inner.num_nodes() && y < self.inner.num_nodes() && self.inner.has_edge(Color::Green, x, y)
    }

    fn has_red_edge(&self, x: usize, y: usize) -> bool {
        x < self.inner.num_nodes() && y < self.inner.num_nodes() && self.inner.has_edge(Color::Red, x, y)
    }

    fn lifting(&self) -> RustPattern {
        RustPattern {
            inner: self.inner.lifting(),
        }
    }

    fn lifting_pairs(&self) -> Vec<(usize, usize)> {
        self.inner.lifting_pairs()
    }

    fn remove_useless_nodes(&mut self) -> usize {
        self.inner.remove_useless_nodes()
    }

    fn remove_useless_edges(&mut self) {
        self.inner.remove_useless_edges();
    }

    fn has_double_selfloop(&self) -> bool {
        self.inner.has_double_selfloop()
    }

    fn is_weakly_connected(&self) -> bool {
        self.inner.is_weakly_connected()
    }

    fn to_normal_form(&self) -> RustPattern {
        RustPattern {
            inner: self.inner.to_normal_form(),
        }
    }

    fn __repr__(&self) -> String {
        let (n, g, r) = self.inner.size();
        format!(
            "Pattern(nodes={n}, green={g}, red={r}, generation={})",
            self.inner.generation()
        )
    }
}

/// Python-visible result of `check()`.
#[pyclass]
pub struct CheckResult {
    /// `"homomorphism"`, `"no_homomorphism"` or `"inconclusive"`.
    #[pyo3(get)]
    pub verdict: String,
    #[pyo3(get)]
    pub certificate: Option<String>,
    #[pyo3(get)]
    pub generation: Option<u32>,
    #[pyo3(get)]
    pub nodes: Option<usize>,
}

#[pymethods]
impl CheckResult {
    fn __repr__(&self) -> String {
        match &self.certificate {
            Some(c) => format!("CheckResult({}, {c})", self.verdict),
            None => format!("CheckResult({}, generation={:?})", self.verdict, self.generation),
        }
    }
}

impl From<Outcome> for CheckResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Homomorphism { generation } => CheckResult {
                verdict: "homomorphism".to_string(),
                certificate: None,
                generation: Some(generation),
                nodes: None,
            },
            Outcome::NoHomomorphism(certificate) => CheckResult {
                verdict: "no_homomorphism".to_string(),
                certificate: Some(certificate.to_string()),
                generation: None,
                nodes: None,
            },
            Outcome::Inconclusive { generation, nodes } => CheckResult {
                verdict: "inconclusive".to_string(),
                certificate: None,
                generation: Some(generation),
                nodes: Some(nodes),
            },
        }
    }
}

#[pyfunction]
#[pyo3(signature = (n, code, max_nodes=14, max_generations=Some(20), path_conditions=true))]
pub fn check(
    py: Python<'_>,
    n: usize,
    code: BigUint,
    max_nodes: usize,
    max_generations: Option<u32>,
    path_conditions: bool,
) -> PyResult<CheckResult> {
    let config = CheckConfig {
        lifting: LiftingConfig {
            max_nodes,
            max_generations,
        },
        path_conditions,
    };
    let outcome = py.allow_threads(|| crate::check::check(n, &code, &config))?;
    Ok(outcome.into())
}

#[pyfunction]
pub fn is_normal_form(n: usize, code: BigUint) -> bool {
    codes::is_normal_form(n, &code)
}

#[pyfunction]
pub fn first_path_condition(pattern: &RustPattern) -> bool {
    CayleyGraph::new(&pattern.inner).check_first_path_condition()
}

#[pyfunction]
pub fn second_path_condition(pattern: &RustPattern) -> bool {
    CayleyGraph::new(&pattern.inner).check_second_path_condition()
}

#[pyfunction]
pub fn third_path_condition(pattern: &RustPattern) -> bool {
    nfa::third_path_condition(&pattern.inner)
}

#[pyfunction]
pub fn cofinite_path_condition(pattern: &RustPattern) -> PyResult<bool> {
    Ok(nfa::cofinite_path_condition(&pattern.inner)?)
}

#[pyfunction]
pub fn is_construction_deterministic(pattern: &RustPattern) -> bool {
    construction::is_construction_deterministic(&pattern.inner)
}
