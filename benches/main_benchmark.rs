use criterion::{Criterion, criterion_group, criterion_main};
use socbuild::output::{OutputSink, Prefix, Stream};
use socbuild::process::ContainerCommand;
use socbuild::process::drain::spawn_reader;
use std::hint::black_box;
use std::io::{self, Cursor};
use std::sync::mpsc;

const FIRMWARE_GCC: &str = "/opt/riscv32i/bin/riscv32-unknown-elf-gcc -v -march=rv32imc -nostartfiles \
    -Wl,-Bstatic,-T,firmware/sections.lds,--strip-debug,-Map=build/firmware/firmware.map,--cref \
    -ffreestanding -nostdlib -o build/firmware/firmware.elf firmware/start.S firmware/entry.c";

fn synth_log(lines: usize) -> Vec<u8> {
    let mut log = Vec::new();
    for i in 0..lines {
        log.extend_from_slice(format!("Info: placed cell {} at (12, 7) after {} iterations\n", i, i % 97).as_bytes());
    }
    log
}

fn bench_read_and_drain(c: &mut Criterion) {
    let log = synth_log(10_000);
    c.bench_function("read_and_drain_10k_lines", |b| {
        b.iter(|| {
            let (wake_tx, _wake_rx) = mpsc::channel();
            let (queue, reader) = spawn_reader(Stream::Stdout, Cursor::new(log.clone()), wake_tx);
            reader.join().unwrap();

            let mut sink = OutputSink::new(Box::new(io::sink()), Box::new(io::sink()));
            sink.prefix_mut().enter_command(2, 3, "build");
            let forwarded = queue.drain(|stream, line| sink.write(stream, line)).unwrap();
            black_box(forwarded)
        })
    });
}

fn bench_prefix_updates(c: &mut Criterion) {
    c.bench_function("prefix_command_and_subtask", |b| {
        b.iter(|| {
            let mut prefix = Prefix::default();
            prefix.enter_command(black_box(1), black_box(3), black_box("compile"));
            prefix.enter_subtask(black_box("gcc"), Some((2, 3)));
            prefix.enter_subtask(black_box("objcopy"), Some((3, 3)));
            black_box(prefix)
        })
    });
}

fn bench_tokenize_command_line(c: &mut Criterion) {
    c.bench_function("tokenize_container_command", |b| {
        let command = ContainerCommand::from(FIRMWARE_GCC);
        b.iter(|| black_box(command.tokens()))
    });
}

criterion_group!(
    benches,
    bench_read_and_drain,
    bench_prefix_updates,
    bench_tokenize_command_line
);
criterion_main!(benches);
