pub mod config;
pub mod record;
pub mod report;
pub mod system;
pub mod transfer;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let definitions = record::definitions()
        .into_iter()
        .chain(report::definitions())
        .chain(transfer::definitions())
        .chain(config::definitions())
        .chain(system::definitions());
    for entry in definitions {
        registry.register(entry);
    }
}
