use std::net::TcpStream;
use std::time::Duration;

use seqstream::{Config, Tc};

fn main() {
    env_logger::init();

    println!(">>> Trying to connect to server...");
    let stream = TcpStream::connect("127.0.0.1:9090").unwrap();
    println!(">>> Connected!");

    let reader = stream.try_clone().unwrap();
    let writer = stream;

    let config = Config::default()
        .with_max_segment_data(100)
        .with_read_timeout(Duration::from_secs(30));

    let tc = Tc::new(config);
    tc.start(reader, writer, None).unwrap();

    tc.write(b"hello from the client\n").unwrap();

    loop {
        let mut buf = [0u8; 1500];
        let n = match tc.read(&mut buf[..]) {
            Ok(n) => n,
            Err(seqstream::Error::Timeout) => continue,
            Err(_) => break,
        };

        println!(
            "\n>>> Read: {:?}\n",
            String::from_iter(buf[..n].iter().map(|c| *c as char))
        );
        break;
    }

    tc.close();
}
