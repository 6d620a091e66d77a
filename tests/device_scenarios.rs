//! Device scenarios - reader/writer/control lintas thread
//!
//! Usage:
//!   cargo test --test device_scenarios

use std::thread;
use std::time::Duration;

use ringdev::core::{CopySource, Fault};
use ringdev::{ControlRequest, ControlResponse, Device, Error, InfoReport, Interrupt};

/// Tunggu sampai writer benar-benar suspend di wait set
fn wait_for_suspended_writer(device: &Device, waits_before: u64) {
    while device.stats().writer_waits == waits_before {
        thread::sleep(Duration::from_millis(1));
    }
}

fn info_of(device: &Device) -> InfoReport {
    match device.control(ControlRequest::QueryInfo).unwrap() {
        ControlResponse::Info(info) => info,
        other => panic!("unexpected response {:?}", other),
    }
}

#[test]
fn test_full_buffer_blocks_writer_until_read() {
    let device = Device::with_capacity(32).unwrap();

    let written = device
        .write(&[0xAAu8; 32][..], 32, &Interrupt::new())
        .unwrap();
    assert_eq!(written, 32);
    assert_eq!(
        info_of(&device),
        InfoReport {
            size: 32,
            length: 32,
            avail: 0
        }
    );

    let writer = {
        let device = device.clone();
        thread::spawn(move || device.write(&[0xBBu8; 32][..], 32, &Interrupt::new()))
    };
    wait_for_suspended_writer(&device, 0);

    let mut out = [0u8; 10];
    assert_eq!(device.read(&mut out[..], 10).unwrap(), 10);
    assert_eq!(out, [0xAA; 10]);

    // Writer bangun dan hanya menulis ruang yang dibebaskan reader
    assert_eq!(writer.join().unwrap().unwrap(), 10);

    let info = info_of(&device);
    assert_eq!((info.length, info.avail), (32, 0));

    let mut rest = [0u8; 32];
    assert_eq!(device.read(&mut rest[..], 32).unwrap(), 32);
    assert_eq!(&rest[..22], &[0xAA; 22][..]);
    assert_eq!(&rest[22..], &[0xBB; 10][..]);
}

#[test]
fn test_interrupt_aborts_suspended_writer() {
    let device = Device::with_capacity(8).unwrap();
    device.write(&[1u8; 8][..], 8, &Interrupt::new()).unwrap();

    let interrupt = Interrupt::new();
    let writer = {
        let device = device.clone();
        let interrupt = interrupt.clone();
        thread::spawn(move || device.write(&[2u8; 4][..], 4, &interrupt))
    };
    wait_for_suspended_writer(&device, 0);

    interrupt.raise();
    let err = writer.join().unwrap().unwrap_err();
    assert!(matches!(err, Error::Interrupted));
    assert!(err.is_retryable());

    // Tidak ada partial write
    let mut out = [0u8; 8];
    assert_eq!(device.read(&mut out[..], 8).unwrap(), 8);
    assert_eq!(out, [1u8; 8]);

    // Retry setelah clear berhasil
    interrupt.clear();
    assert_eq!(device.write(&[2u8; 4][..], 4, &interrupt).unwrap(), 4);
}

#[test]
fn test_clear_wakes_suspended_writer() {
    let device = Device::with_capacity(4).unwrap();
    device.write(&[1u8; 4][..], 4, &Interrupt::new()).unwrap();

    let writer = {
        let device = device.clone();
        thread::spawn(move || device.write(&[9u8; 6][..], 6, &Interrupt::new()))
    };
    wait_for_suspended_writer(&device, 0);

    device.clear();
    assert_eq!(writer.join().unwrap().unwrap(), 4);
}

#[test]
fn test_resize_grow_wakes_suspended_writer() {
    let device = Device::with_capacity(4).unwrap();
    device.write(&[1u8; 4][..], 4, &Interrupt::new()).unwrap();

    let writer = {
        let device = device.clone();
        thread::spawn(move || device.write(&[9u8; 6][..], 6, &Interrupt::new()))
    };
    wait_for_suspended_writer(&device, 0);

    // Tanpa read sama sekali: hanya resize yang membebaskan ruang
    device.resize(8).unwrap();
    assert_eq!(writer.join().unwrap().unwrap(), 4);

    let mut out = [0u8; 8];
    assert_eq!(device.read(&mut out[..], 8).unwrap(), 8);
    assert_eq!(out, [1, 1, 1, 1, 9, 9, 9, 9]);
}

#[test]
fn test_resize_shrink_truncates_to_oldest_bytes() {
    let device = Device::with_capacity(32).unwrap();
    let data: Vec<u8> = (0..20).collect();
    device.write(&data[..], 20, &Interrupt::new()).unwrap();

    let resp = device.control(ControlRequest::Resize(10)).unwrap();
    assert_eq!(
        resp,
        ControlResponse::Resized {
            capacity: 10,
            retained: 10,
            discarded: 10
        }
    );
    assert_eq!(
        info_of(&device),
        InfoReport {
            size: 10,
            length: 10,
            avail: 0
        }
    );

    let mut out = [0u8; 20];
    assert_eq!(device.read(&mut out[..], 20).unwrap(), 10);
    assert_eq!(&out[..10], &data[..10]);
    assert_eq!(device.stats().bytes_discarded, 10);
}

#[test]
fn test_resize_invalid_leaves_buffer_unchanged() {
    let device = Device::with_capacity(32).unwrap();
    let data: Vec<u8> = (100..120).collect();
    device.write(&data[..], 20, &Interrupt::new()).unwrap();
    let before = info_of(&device);

    for bad in [0i64, -1] {
        let err = device.control(ControlRequest::Resize(bad)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    assert_eq!(info_of(&device), before);
    let mut out = [0u8; 32];
    assert_eq!(device.read(&mut out[..], 32).unwrap(), 20);
    assert_eq!(&out[..20], &data[..]);
}

#[test]
fn test_ioctl_command_codes() {
    use ringdev::device::control::{CMD_CLEAR, CMD_INFO, CMD_RESIZE};

    let device = Device::with_capacity(16).unwrap();
    device.write(&[3u8; 12][..], 12, &Interrupt::new()).unwrap();

    match device.ioctl(CMD_INFO, 0).unwrap() {
        ControlResponse::Info(info) => assert_eq!(info.length, 12),
        other => panic!("unexpected response {:?}", other),
    }
    assert!(matches!(
        device.ioctl(CMD_RESIZE, 12).unwrap(),
        ControlResponse::Resized { discarded: 0, .. }
    ));
    assert_eq!(device.ioctl(CMD_CLEAR, 0).unwrap(), ControlResponse::Cleared);
    assert_eq!(device.info().length, 0);
    assert!(matches!(
        device.ioctl(CMD_CLEAR + 0x40, 0),
        Err(Error::InvalidArgument(_))
    ));
}

/// Buffer caller yang tidak bisa dibaca sama sekali
struct UnreadableSource(usize);

impl CopySource for UnreadableSource {
    fn len(&self) -> usize {
        self.0
    }

    fn copy_out(&self, offset: usize, _dst: &mut [u8]) -> Result<(), Fault> {
        Err(Fault { offset })
    }
}

#[test]
fn test_write_fault_propagates_without_mutation() {
    let device = Device::with_capacity(16).unwrap();
    device.write(&[5u8; 4][..], 4, &Interrupt::new()).unwrap();

    let err = device
        .write(&UnreadableSource(8), 8, &Interrupt::new())
        .unwrap_err();
    assert!(matches!(err, Error::IoFault { offset: 0 }));
    assert_eq!(device.info().length, 4);
    assert_eq!(device.stats().faults, 1);
}

#[test]
fn test_streaming_fifo_with_concurrent_grow_resizes() {
    const TOTAL: usize = 64 * 1024;

    let device = Device::with_capacity(16).unwrap();
    let data: Vec<u8> = (0..TOTAL).map(|i| (i % 251) as u8).collect();

    let writer = {
        let device = device.clone();
        let data = data.clone();
        thread::spawn(move || {
            let interrupt = Interrupt::new();
            let mut sent = 0;
            while sent < data.len() {
                let chunk = &data[sent..(sent + 37).min(data.len())];
                sent += device.write(chunk, chunk.len(), &interrupt).unwrap();
            }
        })
    };

    // Hanya grow, jadi tidak ada byte yang terbuang
    let resizer = {
        let device = device.clone();
        thread::spawn(move || {
            for capacity in (17..=64).step_by(3) {
                device.resize(capacity).unwrap();
                thread::yield_now();
            }
        })
    };

    let mut received = Vec::with_capacity(TOTAL);
    let mut buf = [0u8; 29];
    let chunk = buf.len();
    while received.len() < TOTAL {
        let n = device.read(&mut buf[..], chunk).unwrap();
        received.extend_from_slice(&buf[..n]);
        if n == 0 {
            thread::yield_now();
        }
    }

    writer.join().unwrap();
    resizer.join().unwrap();

    assert_eq!(received, data);
    assert_eq!(device.stats().bytes_discarded, 0);
    let info = device.info();
    assert!(info.length <= info.size);
}
