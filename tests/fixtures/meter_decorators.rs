// Items emitted for `decorate_meter` over `api::Battery` and
// `api::BatteryRange`, with the `crate::api` import.

use crate::api;

/// Wraps a `api::Meter` with exactly the capabilities whose accessor is `Some`.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn decorate_meter<B: api::Meter>(base: B, battery: Option<Box<dyn Fn() -> Result<f64, api::Error> + Send + Sync>>, battery_range: Option<Box<dyn Fn() -> i64 + Send + Sync>>) -> DecorateMeter<B> {
    match (battery, battery_range) {
        (None, None) => DecorateMeter::Base(base),
        (Some(battery), None) => DecorateMeter::Battery(DecorateMeterBattery {
            base,
            battery: DecorateMeterBatteryImpl { battery },
        }),
        (None, Some(battery_range)) => DecorateMeter::BatteryRange(DecorateMeterBatteryRange {
            base,
            battery_range: DecorateMeterBatteryRangeImpl { battery_range },
        }),
        (Some(battery), Some(battery_range)) => DecorateMeter::BatteryBatteryRange(DecorateMeterBatteryBatteryRange {
            base,
            battery: DecorateMeterBatteryImpl { battery },
            battery_range: DecorateMeterBatteryRangeImpl { battery_range },
        }),
    }
}

/// A `api::Meter` value together with exactly the capabilities present at dispatch.
///
/// The `api::Meter` value is reached through `base`, `into_base`, `Deref` or `AsRef`; the enum and its composites do not implement `api::Meter` themselves.
pub enum DecorateMeter<B> {
    Base(B),
    Battery(DecorateMeterBattery<B>),
    BatteryRange(DecorateMeterBatteryRange<B>),
    BatteryBatteryRange(DecorateMeterBatteryBatteryRange<B>),
}

impl<B> DecorateMeter<B> {
    /// The embedded base value.
    pub fn base(&self) -> &B {
        match self {
            Self::Base(base) => base,
            Self::Battery(composite) => &composite.base,
            Self::BatteryRange(composite) => &composite.base,
            Self::BatteryBatteryRange(composite) => &composite.base,
        }
    }

    /// Drop every capability and return the base value.
    pub fn into_base(self) -> B {
        match self {
            Self::Base(base) => base,
            Self::Battery(composite) => composite.base,
            Self::BatteryRange(composite) => composite.base,
            Self::BatteryBatteryRange(composite) => composite.base,
        }
    }

    /// The `api::Battery` capability, if this value carries it.
    pub fn as_battery(&self) -> Option<&dyn api::Battery> {
        match self {
            Self::Battery(composite) => Some(composite as &dyn api::Battery),
            Self::BatteryBatteryRange(composite) => Some(composite as &dyn api::Battery),
            _ => None,
        }
    }

    /// The `api::BatteryRange` capability, if this value carries it.
    pub fn as_battery_range(&self) -> Option<&dyn api::BatteryRange> {
        match self {
            Self::BatteryRange(composite) => Some(composite as &dyn api::BatteryRange),
            Self::BatteryBatteryRange(composite) => Some(composite as &dyn api::BatteryRange),
            _ => None,
        }
    }
}

impl<B> core::ops::Deref for DecorateMeter<B> {
    type Target = B;
    fn deref(&self) -> &B {
        self.base()
    }
}

impl<B> core::convert::AsRef<B> for DecorateMeter<B> {
    fn as_ref(&self) -> &B {
        self.base()
    }
}

/// `api::Meter` plus `api::Battery`.
pub struct DecorateMeterBattery<B> {
    base: B,
    battery: DecorateMeterBatteryImpl,
}

impl<B> DecorateMeterBattery<B> {
    /// Drop the capabilities and return the base value.
    pub fn into_base(self) -> B {
        self.base
    }
}

impl<B> core::ops::Deref for DecorateMeterBattery<B> {
    type Target = B;
    fn deref(&self) -> &B {
        &self.base
    }
}

impl<B> core::convert::AsRef<B> for DecorateMeterBattery<B> {
    fn as_ref(&self) -> &B {
        &self.base
    }
}

impl<B> api::Battery for DecorateMeterBattery<B> {
    fn soc(&self) -> Result<f64, api::Error> {
        <DecorateMeterBatteryImpl as api::Battery>::soc(&self.battery)
    }
}

/// `api::Meter` plus `api::BatteryRange`.
pub struct DecorateMeterBatteryRange<B> {
    base: B,
    battery_range: DecorateMeterBatteryRangeImpl,
}

impl<B> DecorateMeterBatteryRange<B> {
    /// Drop the capabilities and return the base value.
    pub fn into_base(self) -> B {
        self.base
    }
}

impl<B> core::ops::Deref for DecorateMeterBatteryRange<B> {
    type Target = B;
    fn deref(&self) -> &B {
        &self.base
    }
}

impl<B> core::convert::AsRef<B> for DecorateMeterBatteryRange<B> {
    fn as_ref(&self) -> &B {
        &self.base
    }
}

impl<B> api::BatteryRange for DecorateMeterBatteryRange<B> {
    fn range(&self) -> i64 {
        <DecorateMeterBatteryRangeImpl as api::BatteryRange>::range(&self.battery_range)
    }
}

/// `api::Meter` plus `api::Battery`, `api::BatteryRange`.
pub struct DecorateMeterBatteryBatteryRange<B> {
    base: B,
    battery: DecorateMeterBatteryImpl,
    battery_range: DecorateMeterBatteryRangeImpl,
}

impl<B> DecorateMeterBatteryBatteryRange<B> {
    /// Drop the capabilities and return the base value.
    pub fn into_base(self) -> B {
        self.base
    }
}

impl<B> core::ops::Deref for DecorateMeterBatteryBatteryRange<B> {
    type Target = B;
    fn deref(&self) -> &B {
        &self.base
    }
}

impl<B> core::convert::AsRef<B> for DecorateMeterBatteryBatteryRange<B> {
    fn as_ref(&self) -> &B {
        &self.base
    }
}

impl<B> api::Battery for DecorateMeterBatteryBatteryRange<B> {
    fn soc(&self) -> Result<f64, api::Error> {
        <DecorateMeterBatteryImpl as api::Battery>::soc(&self.battery)
    }
}

impl<B> api::BatteryRange for DecorateMeterBatteryBatteryRange<B> {
    fn range(&self) -> i64 {
        <DecorateMeterBatteryRangeImpl as api::BatteryRange>::range(&self.battery_range)
    }
}

/// Implements `api::Battery` by calling the stored `soc` accessor.
pub struct DecorateMeterBatteryImpl {
    battery: Box<dyn Fn() -> Result<f64, api::Error> + Send + Sync>,
}

impl api::Battery for DecorateMeterBatteryImpl {
    fn soc(&self) -> Result<f64, api::Error> {
        (self.battery)()
    }
}

/// Implements `api::BatteryRange` by calling the stored `range` accessor.
pub struct DecorateMeterBatteryRangeImpl {
    battery_range: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl api::BatteryRange for DecorateMeterBatteryRangeImpl {
    fn range(&self) -> i64 {
        (self.battery_range)()
    }
}
