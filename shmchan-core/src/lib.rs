//! shmchan Core Library
//!
//! Typed channel endpoints over the libipc shared-memory transport.
//! Provides the channel handle lifecycle, the message transfer protocol,
//! receive buffer ownership, the transport status taxonomy and YAML channel
//! configuration.
//!
//! The transport binding is created explicitly once per process and injected
//! into every channel:
//!
//! ```
//! use shmchan_core::{Channel, ChannelType, MemoryTransport, Mode, Timeout};
//!
//! let transport = MemoryTransport::shared();
//! let rx = Channel::open(transport.clone(), ChannelType::Channel, "doc", Mode::RECEIVER)?;
//! let tx = Channel::open(transport, ChannelType::Channel, "doc", Mode::SENDER)?;
//! tx.send(b"hello", Timeout::Millis(100))?;
//! assert_eq!(rx.receive(Timeout::Millis(100))?, b"hello");
//! # Ok::<(), shmchan_core::ChannelError>(())
//! ```

pub mod channel;
pub mod config;
pub mod convenience;
pub mod error;
pub mod state;
pub mod status;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use channel::Channel;
pub use config::{ChannelConfig, ChannelDefaults, Config, ConfigLoader};
pub use convenience::{clear_channel_storage, receive_message, send_message};
pub use error::{ChannelError, ConfigError, IpcError, IpcResult};
pub use state::ChannelState;
pub use status::Status;
pub use transport::{MemoryTransport, Transport};
#[cfg(feature = "native")]
pub use transport::NativeTransport;
pub use types::{ChannelName, ChannelType, Mode, Timeout};
