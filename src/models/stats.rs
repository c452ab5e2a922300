//! Judgement tiers and per-session hit statistics.

/// Timing classification of a single input or expired note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// Within the perfect window.
    Perfect,
    /// Within tolerance but outside the perfect window.
    Ok,
    /// Outside tolerance, no note in reach, or an expired note.
    Miss,
}

impl Judgement {
    /// Returns true for judgements that extend the combo.
    pub fn is_hit(&self) -> bool {
        !matches!(self, Judgement::Miss)
    }
}

impl std::fmt::Display for Judgement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Judgement::Perfect => write!(f, "PERFECT"),
            Judgement::Ok => write!(f, "OK"),
            Judgement::Miss => write!(f, "MISS"),
        }
    }
}

/// Accumulated hit statistics for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitStats {
    pub perfect: u32,
    pub ok: u32,
    pub miss: u32,
}

impl HitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Ok => self.ok += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Calculates accuracy percentage (0-100).
    ///
    /// Weighted: Perfect counts full, Ok counts half, Miss counts nothing.
    pub fn calculate_accuracy(&self) -> f64 {
        let total = (self.perfect + self.ok + self.miss) as f64;
        if total == 0.0 {
            return 0.0;
        }
        let score = self.perfect as f64 * 2.0 + self.ok as f64;
        (score / (total * 2.0)) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_is_not_a_hit() {
        assert!(Judgement::Perfect.is_hit());
        assert!(Judgement::Ok.is_hit());
        assert!(!Judgement::Miss.is_hit());
    }

    #[test]
    fn accuracy_weights_tiers() {
        let mut stats = HitStats::new();
        assert_eq!(stats.calculate_accuracy(), 0.0);

        stats.record(Judgement::Perfect);
        stats.record(Judgement::Perfect);
        stats.record(Judgement::Ok);
        stats.record(Judgement::Miss);
        // (2*2 + 1) / (4*2) = 62.5%
        assert!((stats.calculate_accuracy() - 62.5).abs() < 1e-9);
    }
}
