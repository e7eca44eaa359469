//! Binary entrypoint for the browser-hosted desktop.

#[cfg(all(target_arch = "wasm32", feature = "csr"))]
fn main() {
    site::mount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This binary targets wasm32 with the `csr` feature. Build `site_app` for the browser.");
}
