use std::net::TcpListener;
use std::time::Duration;

use seqstream::{Config, Tc};

fn main() {
    env_logger::init();

    let listener = TcpListener::bind("127.0.0.1:9090").unwrap();
    println!(">>> Waiting for incoming connections...");
    let (stream, peer) = listener.accept().unwrap();
    println!(">>> Connection accepted from {peer}");

    let reader = stream.try_clone().unwrap();
    let writer = stream;

    let config = Config::default()
        .with_max_segment_data(100)
        .with_read_timeout(Duration::from_secs(30));

    let tc = Tc::new(config);
    tc.start(reader, writer, None).unwrap();

    loop {
        let mut buf = [0u8; 1500];
        let n = match tc.read(&mut buf[..]) {
            Ok(n) => n,
            Err(seqstream::Error::Timeout) => continue,
            Err(_) => break,
        };

        tc.write(&buf[..n]).unwrap();

        println!(
            "\n>>> Read: {:?}\n",
            String::from_iter(buf[..n].iter().map(|c| *c as char))
        );
    }

    tc.close();
}
