//! Blocking I²C drivers for the peripherals on the shared bus.
//!
//! Each driver owns its bus handle (an `embedded-hal-bus` device on
//! target) and implements one collaborator trait:
//!
//! | Driver          | Device                 | Trait                               |
//! |-----------------|------------------------|-------------------------------------|
//! | [`Mb85rc`]      | MB85RC256V FRAM        | [`NvStore`](crate::storage::NvStore) |
//! | [`Rv3028`]      | RV-3028-C7 RTC         | [`Clock`](crate::ui::Clock)          |
//! | [`PairDisplay`] | two LTP305 LED modules | [`LedDisplay`](crate::ui::LedDisplay) |

pub mod fram;
pub mod ltp305;
pub mod rv3028;

pub use fram::Mb85rc;
pub use ltp305::{Ltp305, PairDisplay};
pub use rv3028::Rv3028;
