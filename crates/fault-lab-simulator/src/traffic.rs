use fault_lab_abstract::{ConfigError, TestConfig, TrafficPair};
use rand::Rng;

/// Produces one round's batch of source/destination pairs.
#[derive(Debug, Clone, Copy)]
pub struct TrafficGenerator {
    num_routers: u32,
    num_packets: u32,
}

impl TrafficGenerator {
    /// Fails when fewer than two routers are configured, since no distinct
    /// pair could ever be drawn.
    pub fn new(config: &TestConfig) -> Result<Self, ConfigError> {
        if config.num_routers < 2 {
            return Err(ConfigError::TooFewRouters(config.num_routers));
        }
        Ok(Self {
            num_routers: config.num_routers,
            num_packets: config.num_packets,
        })
    }

    /// Draw exactly `num_packets` pairs. `src` and `dst` are uniform over all
    /// routers; `dst` is redrawn until it differs from `src`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<TrafficPair> {
        (0..self.num_packets)
            .map(|_| {
                let src = rng.random_range(0..self.num_routers);
                let mut dst = rng.random_range(0..self.num_routers);
                while dst == src {
                    dst = rng.random_range(0..self.num_routers);
                }
                TrafficPair::new(src, dst)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(num_routers: u32, num_packets: u32) -> TestConfig {
        TestConfig {
            num_routers,
            num_packets,
            ..Default::default()
        }
    }

    #[test]
    fn pairs_are_distinct_and_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for routers in [2, 3, 4, 64] {
            let generator = TrafficGenerator::new(&config(routers, 500)).unwrap();
            let pattern = generator.generate(&mut rng);
            assert_eq!(pattern.len(), 500);
            for pair in pattern {
                assert_ne!(pair.src, pair.dst);
                assert!(pair.src.0 < routers);
                assert!(pair.dst.0 < routers);
            }
        }
    }

    #[test]
    fn two_routers_cover_both_directions() {
        let mut rng = StdRng::seed_from_u64(9);
        let generator = TrafficGenerator::new(&config(2, 200)).unwrap();
        let pattern = generator.generate(&mut rng);
        assert!(pattern.contains(&TrafficPair::new(0, 1)));
        assert!(pattern.contains(&TrafficPair::new(1, 0)));
    }

    #[test]
    fn too_few_routers_is_a_config_error() {
        assert_eq!(
            TrafficGenerator::new(&config(1, 10)).unwrap_err(),
            ConfigError::TooFewRouters(1)
        );
        assert!(TrafficGenerator::new(&config(0, 10)).is_err());
    }

    #[test]
    fn same_seed_same_pattern() {
        let generator = TrafficGenerator::new(&config(16, 50)).unwrap();
        let a = generator.generate(&mut StdRng::seed_from_u64(42));
        let b = generator.generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
