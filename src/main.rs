//! ringdev - Demo dan benchmark untuk bounded FIFO device
//!
//! Menjalankan skenario writer/reader/control terhadap satu device,
//! lalu benchmark throughput ring buffer.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]

use std::thread;
use std::time::{Duration, Instant};

use ringdev::core::{Backing, RingBuffer};
use ringdev::{ControlRequest, ControlResponse, Device, DeviceConfig, Interrupt};
use tracing_subscriber::EnvFilter;

/// Demo configuration
struct DemoConfig {
    capacity: usize,
    backing: Backing,
    verbose: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: ringdev::config::DEFAULT_CAPACITY,
            backing: Backing::Heap,
            verbose: false,
        }
    }
}

fn main() {
    let config = parse_args();
    init_tracing(config.verbose);

    println!("🚀 ringdev - Bounded FIFO Device");
    println!("================================\n");

    if let Err(e) = run_demo(&config) {
        eprintln!("❌ Demo error: {}", e);
        std::process::exit(1);
    }

    benchmark_ring_buffer(config.backing);

    println!("\n✅ All scenarios complete!");
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "ringdev=debug" } else { "ringdev=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_demo(config: &DemoConfig) -> ringdev::Result<()> {
    let device = Device::new(
        DeviceConfig::default()
            .with_capacity(config.capacity)
            .with_backing(config.backing),
    )?;
    let capacity = config.capacity;

    println!("📊 Blocking Writer (capacity {} bytes)", capacity);
    println!("-----------------------------------------");

    let fill = vec![0xAAu8; capacity];
    let written = device.write(&fill[..], fill.len(), &Interrupt::new())?;
    println!("  Initial write: {} bytes", written);
    println!("  Info:          {}", device.info());

    // Writer kedua akan suspend sampai reader drain
    let writer = {
        let device = device.clone();
        thread::spawn(move || {
            let payload = vec![0xBBu8; capacity];
            let start = Instant::now();
            let result = device.write(&payload[..], payload.len(), &Interrupt::new());
            (result, start.elapsed())
        })
    };

    while device.stats().writer_waits == 0 {
        thread::sleep(Duration::from_millis(1));
    }
    println!("  Writer suspended, buffer full");

    let drain = (capacity / 3).max(1);
    let mut out = vec![0u8; drain];
    let read = device.read(&mut out[..], drain)?;
    println!("  Read:          {} bytes (all 0xAA: {})", read, out.iter().all(|&b| b == 0xAA));

    let (result, waited) = writer
        .join()
        .map_err(|_| ringdev::Error::InvalidArgument("writer thread panicked".into()))?;
    println!(
        "  Writer woke:   {} bytes after {:.2} ms",
        result?,
        waited.as_secs_f64() * 1000.0
    );
    println!("  Info:          {}\n", device.info());

    println!("📊 Interrupted Writer");
    println!("---------------------");

    let interrupt = Interrupt::new();
    let writer = {
        let device = device.clone();
        let interrupt = interrupt.clone();
        thread::spawn(move || device.write(&[0xCCu8][..], 1, &interrupt))
    };
    let waits_before = device.stats().writer_waits;
    while device.stats().writer_waits == waits_before {
        thread::sleep(Duration::from_millis(1));
    }
    interrupt.raise();
    match writer.join() {
        Ok(Err(e)) => println!("  Writer aborted: {} (retryable: {})", e, e.is_retryable()),
        Ok(Ok(n)) => println!("  Writer completed unexpectedly: {} bytes", n),
        Err(_) => println!("  Writer thread panicked"),
    }
    println!();

    println!("📊 Control Channel");
    println!("------------------");

    let shrink = (capacity / 2).max(1);
    if let ControlResponse::Resized {
        capacity,
        retained,
        discarded,
    } = device.control(ControlRequest::Resize(shrink as i64))?
    {
        println!(
            "  Resize:        capacity={} retained={} discarded={}",
            capacity, retained, discarded
        );
    }
    match device.control(ControlRequest::Resize(0)) {
        Err(e) => println!("  Resize(0):     rejected ({})", e),
        Ok(_) => println!("  Resize(0):     accepted ⚠️"),
    }
    device.control(ControlRequest::Clear)?;
    println!("  Clear:         {}", device.info());

    device.stats().print_stats();

    device.teardown();

    println!();
    Ok(())
}

fn benchmark_ring_buffer(backing: Backing) {
    println!("📊 Ring Buffer Benchmark ({:?} backing)", backing);
    println!("-----------------------------------------");

    const ITERATIONS: usize = 1_000_000;
    const CHUNK: usize = 64;

    let mut rb = match RingBuffer::with_backing(64 * 1024, backing) {
        Ok(rb) => rb,
        Err(e) => {
            eprintln!("  Allocation failed: {}", e);
            return;
        }
    };

    let chunk = [0x5Au8; CHUNK];
    let mut out = [0u8; CHUNK];

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        if rb.available() < CHUNK {
            let _ = rb.dequeue(&mut out[..], CHUNK);
        }
        let _ = rb.enqueue(&chunk[..], CHUNK);
    }
    let duration = start.elapsed();

    let ns = duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Chunk size: {} bytes", CHUNK);
    println!("  Operations: {}", ITERATIONS);
    println!("  Latency:    {:.2} ns/op", ns);
    println!(
        "  Throughput: {:.2} MB/sec",
        (ITERATIONS * CHUNK) as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}

fn parse_args() -> DemoConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = DemoConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--capacity" | "-c" => {
                if i + 1 < args.len() {
                    config.capacity = args[i + 1]
                        .parse()
                        .unwrap_or(ringdev::config::DEFAULT_CAPACITY);
                    i += 1;
                }
            }
            "--backing" | "-b" => {
                if i + 1 < args.len() {
                    config.backing = args[i + 1].parse().unwrap_or_default();
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("ringdev - Bounded FIFO device demo\n");
                println!("Usage: ringdev [OPTIONS]\n");
                println!("Options:");
                println!("  -c, --capacity <BYTES>  Initial capacity (default: 32)");
                println!("  -b, --backing <KIND>    heap | mmap (default: heap)");
                println!("  -v, --verbose           Debug logging");
                println!("  -h, --help              Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}
