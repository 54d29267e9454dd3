use showgame_contracts::EnvError;

/// Gas accounting of one call frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn left(&self) -> u64 {
        self.limit - self.used
    }

    /// Consume `amount`, failing without consuming anything when too little
    /// gas is left
    pub fn charge(&mut self, amount: u64) -> Result<(), EnvError> {
        let left = self.left();
        if amount > left {
            return Err(EnvError::OutOfGas {
                required: amount,
                left,
            });
        }
        self.used += amount;
        Ok(())
    }

    /// Meter for a nested frame. A zero limit forwards everything left.
    pub fn nested(&self, limit: u64) -> Result<GasMeter, EnvError> {
        let left = self.left();
        match limit {
            0 => Ok(GasMeter::new(left)),
            limit if limit <= left => Ok(GasMeter::new(limit)),
            limit => Err(EnvError::OutOfGas {
                required: limit,
                left,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge() {
        let mut meter = GasMeter::new(100);
        meter.charge(60).unwrap();
        assert_eq!(meter.left(), 40);
        assert_eq!(
            meter.charge(41),
            Err(EnvError::OutOfGas {
                required: 41,
                left: 40
            })
        );
        assert_eq!(meter.used(), 60);
    }

    #[test]
    fn test_nested_zero_inherits_everything() {
        let mut meter = GasMeter::new(100);
        meter.charge(30).unwrap();
        assert_eq!(meter.nested(0).unwrap().limit(), 70);
        assert_eq!(meter.nested(20).unwrap().limit(), 20);
        assert!(meter.nested(71).is_err());
    }
}
