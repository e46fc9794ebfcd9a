#![allow(dead_code)]

use polymin::{Matrix, Polynomial};

// ─── Rosenbrock ────────────────────────────────────────────────────────────

/// Chained Rosenbrock over `n` variables in the text notation:
/// Σ 100·(x[i+1] - x[i]²)² + (1 - x[i])², expanded.
pub fn rosenbrock_text(n: usize) -> String {
    (1..n)
        .map(|i| {
            format!(
                "100*x[{j}]^2 - 200*x[{i}]^2*x[{j}] + 100*x[{i}]^4 + 1 - 2*x[{i}] + x[{i}]^2",
                i = i,
                j = i + 1
            )
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

pub fn rosenbrock(n: usize) -> Polynomial {
    rosenbrock_text(n)
        .parse()
        .expect("generated Rosenbrock text parses")
}

pub fn point(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}

// ─── Matrices ──────────────────────────────────────────────────────────────

/// Diagonally dominant, hence invertible, `n × n` matrix.
pub fn dominant(n: usize) -> Matrix<f64> {
    let values = (0..n * n)
        .map(|k| {
            let (r, c) = (k / n, k % n);
            if r == c {
                2.0 * n as f64
            } else {
                1.0 / (1.0 + (r + 2 * c) as f64)
            }
        })
        .collect();
    Matrix::new(n, n, values).expect("n > 0")
}
