//! List selectable events.

use quakesplit_core::EventCatalog;

pub fn run(catalog: &EventCatalog) {
    let width = catalog
        .events()
        .iter()
        .map(|e| e.id().len())
        .max()
        .unwrap_or(0);

    for event in catalog.events() {
        println!("{:<width$}  {}", event.id(), event, width = width);
    }
    println!();
    println!("Older ids (loaded_map_<map>, empty) are still accepted in settings files.");
}
