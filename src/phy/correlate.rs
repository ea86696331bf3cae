/// Full cross-correlation of `a` against `b`.
///
/// Output index `k` holds the dot product of `a` with `b` shifted by
/// `k - (b.len() - 1)`, so the output has `a.len() + b.len() - 1` entries
/// and covers every partial overlap, matching the "full" mode of the usual
/// signal processing libraries.
pub(crate) fn correlate_full(a: &[f32], b: &[f32]) -> Vec<f32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0f32; a.len() + b.len() - 1];
    for (k, out_k) in out.iter_mut().enumerate() {
        let shift = k as isize - (b.len() as isize - 1);
        let lo = shift.max(0) as usize;
        let hi = a.len().min((shift + b.len() as isize) as usize);
        let mut acc = 0.0f32;
        for l in lo..hi {
            acc += a[l] * b[(l as isize - shift) as usize];
        }
        *out_k = acc;
    }
    out
}

/// Index of the entry with the largest magnitude, first occurrence on
/// ties. Returns 0 for an empty input.
pub(crate) fn peak_index(corr: &[f32]) -> usize {
    let mut idx = 0;
    let mut max = f32::NEG_INFINITY;
    for (i, &c) in corr.iter().enumerate() {
        if c.abs() > max {
            max = c.abs();
            idx = i;
        }
    }
    idx
}
