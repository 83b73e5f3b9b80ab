//! Vendors and which of them to target

use serde::Deserialize;

/// A rendering engine family with its own property prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Mozilla,
    Webkit,
    Opera,
    Microsoft,
}

impl Vendor {
    /// Table slot order
    pub const ALL: [Vendor; 4] = [Vendor::Mozilla, Vendor::Webkit, Vendor::Opera, Vendor::Microsoft];

    pub fn prefix(self) -> &'static str {
        match self {
            Vendor::Mozilla => "-moz-",
            Vendor::Webkit => "-webkit-",
            Vendor::Opera => "-o-",
            Vendor::Microsoft => "-ms-",
        }
    }

    /// Slot index in a rename tuple
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which vendors get prefixed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrefixOptions {
    pub mozilla: bool,
    pub webkit: bool,
    pub opera: bool,
    pub microsoft: bool,
}

impl Default for PrefixOptions {
    fn default() -> Self {
        Self {
            mozilla: true,
            webkit: true,
            opera: true,
            microsoft: true,
        }
    }
}

impl PrefixOptions {
    /// No vendor enabled
    pub fn none() -> Self {
        Self {
            mozilla: false,
            webkit: false,
            opera: false,
            microsoft: false,
        }
    }

    /// Exactly one vendor enabled
    pub fn only(vendor: Vendor) -> Self {
        let mut options = Self::none();
        match vendor {
            Vendor::Mozilla => options.mozilla = true,
            Vendor::Webkit => options.webkit = true,
            Vendor::Opera => options.opera = true,
            Vendor::Microsoft => options.microsoft = true,
        }
        options
    }

    pub fn enabled(&self, vendor: Vendor) -> bool {
        match vendor {
            Vendor::Mozilla => self.mozilla,
            Vendor::Webkit => self.webkit,
            Vendor::Opera => self.opera,
            Vendor::Microsoft => self.microsoft,
        }
    }

    /// Enabled vendors in slot order
    pub fn vendors(&self) -> impl Iterator<Item = Vendor> + '_ {
        Vendor::ALL.into_iter().filter(|&v| self.enabled(v))
    }
}
