//! Largest-Triangle-Three-Buckets downsampling.
//!
//! Browsers choke on line charts with hundreds of thousands of points. LTTB
//! keeps the visual shape: the first and last points always survive, and each
//! bucket in between contributes the point forming the largest triangle with
//! the previously kept point and the average of the next bucket.
//!
//! See <https://github.com/sveinn-steinarsson/flot-downsample/>.

use std::collections::BTreeMap;

/// Reduces `points` to exactly `sample_size` points when it has more.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use solverforge_report::chart::largest_triangle_three_buckets;
///
/// let points: BTreeMap<u64, f64> = (0..1000).map(|x| (x, (x % 7) as f64)).collect();
/// let sampled = largest_triangle_three_buckets(&points, 100);
/// assert_eq!(sampled.len(), 100);
/// assert!(sampled.contains_key(&0) && sampled.contains_key(&999));
/// ```
pub fn largest_triangle_three_buckets(
    points: &BTreeMap<u64, f64>,
    sample_size: usize,
) -> BTreeMap<u64, f64> {
    if points.len() <= sample_size || sample_size < 3 {
        return points.clone();
    }
    let data: Vec<(f64, f64, u64)> = points.iter().map(|(&x, &y)| (x as f64, y, x)).collect();
    let len = data.len();
    let mut sampled = BTreeMap::new();

    // Bucket size, leaving room for the start and end points.
    let every = (len - 2) as f64 / (sample_size - 2) as f64;
    let mut a = 0usize;

    sampled.insert(data[0].2, data[0].1);

    for i in 0..sample_size - 2 {
        // Average of the next bucket.
        let mut avg_range_start = ((i + 1) as f64 * every).floor() as usize + 1;
        let avg_range_end = (((i + 2) as f64 * every).floor() as usize + 1).min(len);
        let avg_range_length = (avg_range_end - avg_range_start) as f64;
        let (mut avg_x, mut avg_y) = (0.0, 0.0);
        while avg_range_start < avg_range_end {
            avg_x += data[avg_range_start].0;
            avg_y += data[avg_range_start].1;
            avg_range_start += 1;
        }
        avg_x /= avg_range_length;
        avg_y /= avg_range_length;

        // Current bucket.
        let mut range_offs = (i as f64 * every).floor() as usize + 1;
        let range_to = ((i + 1) as f64 * every).floor() as usize + 1;

        let (point_ax, point_ay) = (data[a].0, data[a].1);
        let mut max_area = -1.0;
        let mut next_a = range_offs;

        while range_offs < range_to {
            let area = ((point_ax - avg_x) * (data[range_offs].1 - point_ay)
                - (point_ax - data[range_offs].0) * (avg_y - point_ay))
                .abs()
                * 0.5;
            if area > max_area {
                max_area = area;
                next_a = range_offs;
            }
            range_offs += 1;
        }

        sampled.insert(data[next_a].2, data[next_a].1);
        a = next_a;
    }

    let (_, last_y, last_x) = data[len - 1];
    sampled.insert(last_x, last_y);
    sampled
}
