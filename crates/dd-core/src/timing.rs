use std::time::Duration;

/// Durées de lecture dérivées de l'unité `dot`.
///
/// Tout découle du point: trait = 3 points, pause inter-symbole = 1 point,
/// espace = 7 points de silence.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use dd_core::timing::MorseTiming;
/// let timing = MorseTiming::default();
/// assert_eq!(timing.dit(), Duration::from_millis(100));
/// assert_eq!(timing.dah(), Duration::from_millis(300));
/// assert_eq!(timing.space_gap(), Duration::from_millis(700));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorseTiming {
    dot: Duration,
}

impl Default for MorseTiming {
    fn default() -> Self {
        Self {
            dot: Duration::from_millis(100),
        }
    }
}

impl MorseTiming {
    /// Construit depuis une durée de point en secondes, bornée à
    /// [0.001, 10.0] s.
    #[must_use]
    pub fn from_dot_secs(dot_secs: f64) -> Self {
        let clamped = if dot_secs.is_finite() {
            dot_secs.clamp(0.001, 10.0)
        } else {
            0.1
        };
        Self {
            dot: Duration::from_secs_f64(clamped),
        }
    }

    /// Tonalité d'un point.
    #[inline]
    #[must_use]
    pub fn dit(&self) -> Duration {
        self.dot
    }

    /// Tonalité d'un trait — 3 points.
    #[inline]
    #[must_use]
    pub fn dah(&self) -> Duration {
        self.dot * 3
    }

    /// Pause après un point ou un trait — 1 point.
    #[inline]
    #[must_use]
    pub fn element_gap(&self) -> Duration {
        self.dot
    }

    /// Silence pour un espace de la chaîne Morse — 7 points.
    #[inline]
    #[must_use]
    pub fn space_gap(&self) -> Duration {
        self.dot * 7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_follow_the_dot() {
        let timing = MorseTiming::from_dot_secs(0.05);
        assert_eq!(timing.dit(), Duration::from_millis(50));
        assert_eq!(timing.dah(), Duration::from_millis(150));
        assert_eq!(timing.element_gap(), Duration::from_millis(50));
        assert_eq!(timing.space_gap(), Duration::from_millis(350));
    }

    #[test]
    fn dot_is_bounded() {
        assert_eq!(
            MorseTiming::from_dot_secs(0.0),
            MorseTiming::from_dot_secs(0.001)
        );
        assert_eq!(
            MorseTiming::from_dot_secs(1e9),
            MorseTiming::from_dot_secs(10.0)
        );
        assert_eq!(
            MorseTiming::from_dot_secs(f64::NAN),
            MorseTiming::from_dot_secs(0.1)
        );
    }

    #[test]
    fn default_dot_is_a_tenth_of_a_second() {
        assert_eq!(MorseTiming::default().dit(), Duration::from_millis(100));
    }
}
