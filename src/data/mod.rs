/// Data layer: core types, loading, table assembly, windowing and statistics.
///
/// Architecture:
/// ```text
///  folder/ *.txt  (wavelength  reflectance)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → (label, [(file name, SampleTable)])
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ SampleCollection  │  insertion-ordered key → SampleTable
///   └──────────────────┘
///        │  assemble
///        ▼
///   ┌───────────────────┐
///   │ WideSpectrumTable  │  wavelength + one column per sample (+ labels)
///   └───────────────────┘
///        │                     │
///        ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │  window   │         │  stats    │  describe / box / per-class
///   └──────────┘         └──────────┘
/// ```

pub mod assemble;
pub mod error;
pub mod loader;
pub mod model;
pub mod stats;
pub mod window;

pub use assemble::{assemble, assemble_with, AssembleOptions};
pub use error::SpectrumError;
pub use model::{SampleCollection, SampleTable, SpectrumColumn, WideSpectrumTable};
pub use window::{partition, partition_with, Partition, RemainderPolicy, Window};
