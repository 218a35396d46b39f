use crate::profile::classify::{parse_temporal, TemporalValue};

/// Whether every value seen so far can be read as some type, along with what
/// has been learned about them. Once disproven it stays that way.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability<T> {
    Active(T),
    Disproven,
}

impl<T> Capability<T> {
    /// Runs `f` on the accumulated state while active, disproving the
    /// capability if it returns `false`.
    pub fn check<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T) -> bool,
    {
        if let Capability::Active(ref mut state) = self {
            if !f(state) {
                *self = Capability::Disproven;
            }
        }
    }

    pub fn disprove(&mut self) {
        *self = Capability::Disproven;
    }

    pub fn is_active(&self) -> bool {
        match self {
            Capability::Active(_) => true,
            Capability::Disproven => false,
        }
    }

    pub fn active(&self) -> Option<&T> {
        match self {
            Capability::Active(state) => Some(state),
            Capability::Disproven => None,
        }
    }
}

impl<T: Default> Default for Capability<T> {
    fn default() -> Capability<T> {
        Capability::Active(T::default())
    }
}

/// Bounds and running sum of a set of numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub sum: f64,
    pub count: usize,
}

impl<T> Default for Numeric<T> {
    fn default() -> Numeric<T> {
        Numeric {
            min: None,
            max: None,
            sum: 0.0,
            count: 0,
        }
    }
}

impl<T: PartialOrd + Copy> Numeric<T> {
    /// Accounts for `value`, which adds `amount` to the sum.
    pub fn observe(&mut self, value: T, amount: f64) {
        match self.min {
            Some(min) if min <= value => {}
            _ => self.min = Some(value),
        }

        match self.max {
            Some(max) if max >= value => {}
            _ => self.max = Some(value),
        }

        self.sum += amount;
        self.count += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Dates, times or timestamps written in a single format.
///
/// The first format that reads a value is locked in and is the only one tried
/// afterwards. The bounds keep the raw text of the smallest and largest
/// values; among equal values the first one seen is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Temporal<T> {
    pub format: Option<String>,
    pub min: Option<(T, String)>,
    pub max: Option<(T, String)>,
}

impl<T> Default for Temporal<T> {
    fn default() -> Temporal<T> {
        Temporal {
            format: None,
            min: None,
            max: None,
        }
    }
}

impl<T: TemporalValue> Temporal<T> {
    /// Tries to read `value` with the locked format, or with the first of
    /// `formats` that works if none is locked yet.
    pub fn update<F: AsRef<str>>(&mut self, value: &str, formats: &[F]) -> bool {
        let parsed = match self.format {
            Some(ref format) => parse_temporal::<T>(value, format),
            None => match formats
                .iter()
                .find_map(|format| parse_temporal::<T>(value, format.as_ref()).map(|p| (p, format)))
            {
                Some((parsed, format)) => {
                    self.format = Some(format.as_ref().to_string());

                    Some(parsed)
                }
                None => None,
            },
        };

        match parsed {
            Some(parsed) => {
                self.observe(parsed, value);

                true
            }
            None => false,
        }
    }

    fn observe(&mut self, parsed: T, raw: &str) {
        let smaller = match self.min {
            Some((ref min, _)) => parsed < *min,
            None => true,
        };

        if smaller {
            self.min = Some((parsed.clone(), raw.to_string()));
        }

        let larger = match self.max {
            Some((ref max, _)) => parsed > *max,
            None => true,
        };

        if larger {
            self.max = Some((parsed, raw.to_string()));
        }
    }

    pub fn min_text(&self) -> Option<&str> {
        self.min.as_ref().map(|(_, raw)| raw.as_str())
    }

    pub fn max_text(&self) -> Option<&str> {
        self.max.as_ref().map(|(_, raw)| raw.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Capability, Numeric, Temporal};
    use chrono::NaiveTime;

    #[test]
    fn test_capability_is_one_way() {
        let mut cap: Capability<Numeric<i128>> = Capability::default();

        cap.check(|n| {
            n.observe(3, 3.0);
            true
        });
        assert!(cap.is_active());

        cap.check(|_| false);
        assert_eq!(cap, Capability::Disproven);

        cap.check(|_| true);
        assert!(!cap.is_active());
        assert!(cap.active().is_none());
    }

    #[test]
    fn test_numeric() {
        let mut n = Numeric::default();

        for v in [123i128, -45, 6].iter() {
            n.observe(*v, *v as f64);
        }

        assert_eq!(n.min, Some(-45));
        assert_eq!(n.max, Some(123));
        assert_eq!(n.count, 3);
        assert_eq!(n.mean(), Some(28.0));
        assert_eq!(Numeric::<f64>::default().mean(), None);
    }

    #[test]
    fn test_temporal_locks_format() {
        let mut t: Temporal<NaiveTime> = Temporal::default();
        let formats = ["%H:%M", "%H:%M:%S"];

        assert!(t.update("13:00:05", &formats));
        assert_eq!(t.format.as_deref(), Some("%H:%M:%S"));

        // the shorter format is not tried anymore
        assert!(!t.update("14:00", &formats));
        assert_eq!(t.format.as_deref(), Some("%H:%M:%S"));
    }

    #[test]
    fn test_temporal_bounds_keep_raw_text() {
        let mut t: Temporal<NaiveTime> = Temporal::default();
        let formats = ["%I:%M %p"];

        assert!(t.update("01:00 PM", &formats));
        assert!(t.update("09:30 am", &formats));
        assert!(t.update("1:00 pm", &formats));

        assert_eq!(t.min_text(), Some("09:30 am"));
        assert_eq!(t.max_text(), Some("01:00 PM"));
    }
}
