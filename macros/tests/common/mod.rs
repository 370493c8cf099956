//! Contracts shared by the macro tests.

#![allow(dead_code)]

pub mod api {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Error(pub String);

    pub trait Meter {
        fn current_power(&self) -> Result<f64, Error>;
    }

    pub trait Battery {
        fn soc(&self) -> Result<f64, Error>;
    }

    pub trait BatteryRange {
        fn range(&self) -> i64;
    }

    pub trait MeterEnergy {
        fn total_energy(&self) -> f64;
    }

    pub trait PhaseCurrents {
        fn currents(&self, phase: u8, scale: f64) -> (f64, f64, f64);
    }

    pub trait Range {
        fn distance(&self) -> u32;
    }

    pub trait Type {
        fn kind(&self) -> u8;
    }

    /// Shares its name with the default generic parameter.
    #[derive(Debug, Clone, PartialEq)]
    pub struct B(pub u8);

    pub trait Label {
        fn label(&self, prefix: B) -> B;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestMeter {
    pub power: f64,
}

impl api::Meter for TestMeter {
    fn current_power(&self) -> Result<f64, api::Error> {
        Ok(self.power)
    }
}

/// Whether `$T` implements `$Trait`, decided at compile time through an
/// inherent const that only exists when the bound holds.
#[allow(unused_macros)]
macro_rules! implements {
    ($T:ty, $Trait:path) => {{
        struct __Probe<T>(core::marker::PhantomData<T>);

        trait __Fallback {
            const VAL: bool = false;
        }
        impl<T> __Fallback for __Probe<T> {}

        impl<T: $Trait> __Probe<T> {
            #[allow(dead_code)]
            const VAL: bool = true;
        }

        __Probe::<$T>::VAL
    }};
}
