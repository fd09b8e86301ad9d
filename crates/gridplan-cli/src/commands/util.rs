use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::Path;

pub fn configure_threads(threads: &str) {
    let count = if threads.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        threads.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Write `payload` to `out`, or print it when no path is given.
pub fn emit(out: Option<&Path>, payload: &str, what: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            fs::write(path, payload)?;
            println!("{what} written to {}", path.display());
        }
        None => println!("{payload}"),
    }
    Ok(())
}
