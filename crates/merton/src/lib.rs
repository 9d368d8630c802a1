//! merton: an option pricing engine for the Black-Scholes-Merton model.
//!
//! Copyright (C) 2024-2026 <https://github.com/merton-rs>
//!
//! Dual licensed under Apache 2.0 and MIT.
//!
//! See:
//! - LICENSE-APACHE.md
//! - LICENSE-MIT.md
//!
//! # Overview
//!
//! Given a market state (spot, volatility, valuation instant, risk-free
//! rate, dividend yield) and a vanilla instrument (strike, expiry,
//! call/put/forward, European/American), the engine computes the fair
//! premium, the sensitivities (delta, gamma, vega, theta, rho, psi), the
//! implied volatility and implied dividend yield, and — for American
//! options — the early-exercise boundary.
//!
//! Three engines are available behind one facade: closed-form analytics
//! (over plain floats, forward-mode duals or a reverse-mode tape), a
//! Cox-Ross-Rubinstein binomial lattice, and the QD+ approximation for
//! American options.
//!
//! ```
//! use merton::prelude::*;
//! use time::macros::datetime;
//!
//! # fn main() -> Result<(), MertonError> {
//! let market = MarketParameters::new(100.0, 0.20, datetime!(2024-01-02 0:00 UTC), 0.01, 0.05);
//! let expiry = market.valuation + years(0.5);
//!
//! let call = EuropeanOption::new(100.0, expiry, TypeFlag::Call);
//! let pricing = AnalyticSolver::<Plain>::new(market).solve(&call)?;
//!
//! assert!((pricing.price() - 4.62377).abs() < 1e-5);
//! # Ok(())
//! # }
//! ```

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// MERTON MODULES
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The merton prelude.
pub mod prelude {
    pub use merton_autodiff::*;
    pub use merton_error::*;
    pub use merton_instruments::*;
    pub use merton_math::*;
    pub use merton_pricing::*;
    pub use merton_time::*;
    pub use merton_utils::*;
}

/// The `autodiff` module.
pub mod autodiff {
    pub use merton_autodiff::*;
}

/// The `error` module.
pub mod error {
    pub use merton_error::*;
}

/// The `instruments` module.
pub mod instruments {
    pub use merton_instruments::*;
}

/// The `math` module.
pub mod math {
    pub use merton_math::*;
}

/// The `pricing` module.
pub mod pricing {
    pub use merton_pricing::*;
}

/// The `time` module.
pub mod time {
    pub use merton_time::*;
}

/// The `utils` module.
#[macro_use]
pub mod utils {
    pub use merton_utils::*;
}
