//! Wire formats spoken by `jumpr` over whatever stream a dialer hands out.

pub mod http;
