/// Data layer: table model, loading, and the two analyses.
///
/// Architecture:
/// ```text
///  item_proto.txt / item_names.txt / mob_proto.txt / mob_names.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  tab-delimited file → Table (sorted keys, ranges)
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌────────────┐    ┌──────────┐
///   │ duplicates │    │ compare  │  pair, both directions
///   └────────────┘    └──────────┘
/// ```

pub mod compare;
pub mod duplicates;
pub mod loader;
pub mod model;
