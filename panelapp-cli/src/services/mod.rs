// Business logic services layer
//
// Extraction workflows shared by the CLI commands. Each takes a
// `JsonFetcher` so it can run against the live API or a test double.

pub mod data_folder;
pub mod genes;
pub mod panel_list;
pub mod probe;
