//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements     | Connects to                 |
//! |---------------|----------------|-----------------------------|
//! | `ir_pin`      | EdgeSource     | ESP32 GPIO ISR / host sim   |
//! | `polled_pin`  | EdgeSource     | any `embedded_hal` input    |
//! | `log_sink`    | DiagnosticSink | Serial log output           |
//! | `time`        | Clock          | ESP32 system timer          |

pub mod ir_pin;
pub mod log_sink;
pub mod polled_pin;
pub mod time;
