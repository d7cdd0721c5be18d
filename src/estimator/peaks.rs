//! Peak detection on ordered samples.
//!
//! A peak is a sample strictly greater than its left neighbour and strictly
//! greater than the first differing sample to its right. Flat tops count once,
//! at the middle of the plateau (left of centre for even lengths). The first
//! and last samples are never peaks.

/// Indices of all local maxima in `signal`, ascending
#[allow(clippy::float_cmp)] // Plateaus are exact repeats
pub fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push((i + ahead - 1) / 2);
                // Nothing inside the plateau can be a maximum
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Drop peaks closer than `distance` samples to a higher peak.
///
/// Peaks are visited from highest to lowest; each surviving peak removes
/// every neighbour within `distance - 1` samples on both sides.
pub fn select_by_distance(peaks: Vec<usize>, signal: &[f64], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks;
    }

    let mut keep = vec![true; peaks.len()];
    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| signal[peaks[a]].total_cmp(&signal[peaks[b]]));

    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }

        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in (j + 1)..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(peak, kept)| kept.then_some(peak))
        .collect()
}

/// Find local maxima in `signal` that are at least `distance` samples apart
pub fn find_peaks(signal: &[f64], distance: usize) -> Vec<usize> {
    select_by_distance(local_maxima(signal), signal, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_maxima() {
        let signal = [0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0];
        assert_eq!(local_maxima(&signal), vec![1, 3, 5]);
    }

    #[test]
    fn test_endpoints_are_not_peaks() {
        let signal = [5.0, 1.0, 0.0, 1.0, 5.0];
        assert!(local_maxima(&signal).is_empty());
    }

    #[test]
    fn test_short_signals() {
        assert!(find_peaks(&[], 10).is_empty());
        assert!(find_peaks(&[1.0], 10).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 10).is_empty());
    }

    #[test]
    fn test_plateau_counts_once_at_midpoint() {
        // Odd plateau: indices 2..=4, midpoint 3
        let signal = [0.0, 1.0, 2.0, 2.0, 2.0, 1.0, 0.0];
        assert_eq!(local_maxima(&signal), vec![3]);

        // Even plateau: indices 2..=3, left of centre
        let signal = [0.0, 1.0, 2.0, 2.0, 1.0];
        assert_eq!(local_maxima(&signal), vec![2]);
    }

    #[test]
    fn test_plateau_into_rise_is_not_a_peak() {
        let signal = [0.0, 2.0, 2.0, 3.0, 0.0];
        assert_eq!(local_maxima(&signal), vec![3]);
    }

    #[test]
    fn test_plateau_at_end_is_not_a_peak() {
        let signal = [0.0, 1.0, 2.0, 2.0];
        assert!(local_maxima(&signal).is_empty());
    }

    #[test]
    fn test_distance_keeps_highest() {
        // Peaks at 2 (h=3), 5 (h=5), 9 (h=4), 20 (h=1)
        let mut signal = vec![0.0; 25];
        signal[2] = 3.0;
        signal[5] = 5.0;
        signal[9] = 4.0;
        signal[20] = 1.0;

        assert_eq!(local_maxima(&signal), vec![2, 5, 9, 20]);
        assert_eq!(find_peaks(&signal, 10), vec![5, 20]);
        assert_eq!(find_peaks(&signal, 4), vec![5, 9, 20]);
        assert_eq!(find_peaks(&signal, 1), vec![2, 5, 9, 20]);
    }

    #[test]
    fn test_distance_is_exclusive_bound() {
        // Two equal peaks exactly `distance` apart both survive
        let mut signal = vec![0.0; 30];
        signal[5] = 1.0;
        signal[15] = 1.0;
        assert_eq!(find_peaks(&signal, 10), vec![5, 15]);

        // One sample closer and only one survives
        let mut signal = vec![0.0; 30];
        signal[5] = 1.0;
        signal[14] = 1.0;
        assert_eq!(find_peaks(&signal, 10).len(), 1);
    }

    #[test]
    fn test_sine_wave_peak_count() {
        // 5 full periods of 20 samples each
        let signal: Vec<f64> = (0..100i32)
            .map(|i| (2.0 * std::f64::consts::PI * f64::from(i) / 20.0).sin())
            .collect();
        assert_eq!(find_peaks(&signal, 10).len(), 5);
    }
}
