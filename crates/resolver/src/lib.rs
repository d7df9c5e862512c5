//! json-resolver: typed object graphs over self-describing JSON.
//!
//! Every JSON object that carries a discriminator field (by default
//! `json_resolve_class`) names the type it should be decoded into. The
//! [`Resolver`] looks that name up in a caller-owned [`TypeRegistry`],
//! builds a default instance, and copies the remaining keys onto it through
//! the type's [`Resolvable`] field descriptor, recursing into arrays, maps
//! and nested tagged objects. Encoding runs the same walk in reverse and
//! stamps each typed object with its identifier.
//!
//! ```
//! use json_resolver::{resolvable, Resolver, TypeRegistry};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Track {
//!     title: String,
//!     seconds: u32,
//! }
//! resolvable!(Track as "music.Track" { title, seconds });
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Album {
//!     name: String,
//!     tracks: Vec<Track>,
//! }
//! resolvable!(Album as "music.Album" { name, tracks });
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Track>()?.register::<Album>()?;
//! let resolver = Resolver::new(&registry);
//!
//! let album = Album {
//!     name: "Blue".to_string(),
//!     tracks: vec![Track { title: "River".to_string(), seconds: 240 }],
//! };
//! let json = resolver.encode(&album)?;
//! assert!(json.contains(r#""json_resolve_class":"music.Track""#));
//!
//! let back: Album = resolver.decode_as(&json)?;
//! assert_eq!(back, album);
//! # Ok::<(), json_resolver::ResolveError>(())
//! ```

pub mod config;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod node;
pub mod object;
pub mod registry;
pub mod resolver;

pub use config::{ResolverConfig, UnknownFieldPolicy, DEFAULT_DISCRIMINATOR, DEFAULT_MAX_DEPTH};
pub use convert::{FromNode, ToNode};
pub use decode::is_empty_payload;
pub use error::ResolveError;
pub use node::Node;
pub use object::{Fields, Resolvable};
pub use registry::{Factory, TypeRegistry};
pub use resolver::Resolver;
