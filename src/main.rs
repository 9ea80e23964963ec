mod classify;
mod config;
mod filename;
mod keys;
mod library;
mod pipeline;
mod playlists;
mod relocate;
mod runtime;
mod tags;
mod track;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
