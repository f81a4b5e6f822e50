//! Pure matrix math helpers. No FunctionReturn, no allocation.
//! Column-major storage: element at (row, col) = data[col * n + row].
//!
//! Used by the operator and constructor implementations in `functions`.

#[inline]
pub fn at(m: &[f32], n: usize, row: usize, col: usize) -> f32 {
    m[col * n + row]
}

/// `out = a * b` for two `n×n` matrices.
pub fn mul_into(a: &[f32], b: &[f32], n: usize, out: &mut [f32]) {
    for col in 0..n {
        for row in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += at(a, n, row, k) * at(b, n, k, col);
            }
            out[col * n + row] = sum;
        }
    }
}

/// `out = m * v` for an `n×n` matrix and an `n`-component column vector.
pub fn mul_vec_into(m: &[f32], v: &[f32], n: usize, out: &mut [f32]) {
    for row in 0..n {
        let mut sum = 0.0;
        for k in 0..n {
            sum += at(m, n, row, k) * v[k];
        }
        out[row] = sum;
    }
}

pub fn scale_into(m: &[f32], s: f32, out: &mut [f32]) {
    for (o, v) in out.iter_mut().zip(m) {
        *o = v * s;
    }
}

pub fn transpose_into(m: &[f32], n: usize, out: &mut [f32]) {
    for col in 0..n {
        for row in 0..n {
            out[col * n + row] = at(m, n, col, row);
        }
    }
}

/// Copy column `col` of an `n×n` matrix into `out[..n]`.
pub fn column_into(m: &[f32], n: usize, col: usize, out: &mut [f32]) {
    out[..n].copy_from_slice(&m[col * n..col * n + n]);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
