// In demos/stream.rs
//
// Several writers append fixed-width hash lines to one in-process log device
// while a reader keeps draining it. Every line the reader sees must be whole:
// the store never hands out a half-overwritten slot.
//
//   RUST_LOG=info cargo run --example stream -- [writers]
use klog_ring::LogBuilder;
use log::{error, info, warn};
use sha2::{Digest, Sha256};
use std::env;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// 15 hex digits and a newline.
const LINE_LEN: usize = 16;

fn line_for(writer: usize, seq: u64) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(format!("writer_{}_message_{}", writer, seq).as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    let mut line = hex.as_bytes()[..LINE_LEN - 1].to_vec();
    line.push(b'\n');
    line
}

fn main() -> io::Result<()> {
    env_logger::init();

    let writers: usize = match env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("writers: {}", e)))?,
        None => 4,
    };

    let device = Arc::new(
        LogBuilder::new()
            .with_slots(64, LINE_LEN + 1)
            .with_max_handles(writers + 1)
            .build_device()?,
    );

    let keep_alive = Arc::new(AtomicBool::new(true));
    let keep_alive_for_handler = Arc::clone(&keep_alive);

    // Handle Ctrl+C to stop every thread
    ctrlc::set_handler(move || {
        keep_alive_for_handler.store(false, Ordering::SeqCst);
    })
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    // Watch the store lock for deadlocks while the demo runs
    {
        let keep_alive = Arc::clone(&keep_alive);
        thread::spawn(move || {
            while keep_alive.load(Ordering::Acquire) {
                thread::sleep(Duration::from_secs(1));
                let deadlocks = parking_lot::deadlock::check_deadlock();
                if deadlocks.is_empty() {
                    continue;
                }
                error!("{} deadlocks detected", deadlocks.len());
                for (i, threads) in deadlocks.iter().enumerate() {
                    for t in threads {
                        error!("deadlock #{} thread {:?}\n{:?}", i, t.thread_id(), t.backtrace());
                    }
                }
                std::process::exit(1);
            }
        });
    }

    let appended = Arc::new(AtomicU64::new(0));
    let mut handles = Vec::new();

    for w in 0..writers {
        let device = Arc::clone(&device);
        let keep_alive = Arc::clone(&keep_alive);
        let appended = Arc::clone(&appended);
        handles.push(thread::spawn(move || -> io::Result<()> {
            let handle = device.open()?;
            let mut seq = 0u64;
            while keep_alive.load(Ordering::Acquire) {
                handle.write(line_for(w, seq).as_slice())?;
                appended.fetch_add(1, Ordering::Relaxed);
                seq += 1;
                thread::sleep(Duration::from_millis(5));
            }
            Ok(())
        }));
    }

    let reader = {
        let device = Arc::clone(&device);
        let keep_alive = Arc::clone(&keep_alive);
        thread::spawn(move || -> io::Result<u64> {
            let mut lines_seen = 0u64;
            while keep_alive.load(Ordering::Acquire) {
                let mut handle = device.open()?;
                let stream = handle.read_to_vec(device.store().total_capacity())?;
                drop(handle);

                for line in stream.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
                    if line.len() != LINE_LEN - 1 || !line.iter().all(u8::is_ascii_hexdigit) {
                        warn!("torn line in stream: {:?}", String::from_utf8_lossy(line));
                        return Err(io::Error::new(io::ErrorKind::InvalidData, "torn line"));
                    }
                    lines_seen += 1;
                }
                thread::sleep(Duration::from_millis(100));
            }
            Ok(lines_seen)
        })
    };

    info!("streaming with {} writers, Ctrl+C to stop", writers);

    for h in handles {
        h.join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "writer panicked"))??;
    }
    let lines_seen = reader
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "reader panicked"))??;

    println!(
        "appended {} lines, reader verified {} lines, {} retained",
        appended.load(Ordering::Relaxed),
        lines_seen,
        device.store().len()
    );
    Ok(())
}
