use std::str::FromStr;

pub use anyhow;

pub type Res<T> = anyhow::Result<T>;

pub fn parse_int_from_str<T: FromStr>(as_str: &str, name: &str) -> Res<T> {
    // the error type of parse::<T>() isn't bounded, so we just write the error message ourselves
    as_str
        .trim()
        .parse::<T>()
        .map_err(|_err| anyhow::anyhow!("Couldn't parse {name} ('{as_str}')"))
}
