//! Display utilities

use std::fmt::{self, Display, Write};

fn sep(w: &mut impl Write, separator: &str, xs: &[impl Display]) -> fmt::Result {
    for (idx, v) in xs.iter().enumerate() {
        if idx != 0 {
            write!(w, "{}", separator)?;
        }
        write!(w, "{}", v)?;
    }
    Ok(())
}

#[inline]
pub fn commas(w: &mut impl Write, xs: &[impl Display]) -> fmt::Result {
    sep(w, ", ", xs)
}

fn bracket<W>(
    w: &mut W,
    left: &impl Display,
    right: &impl Display,
    middle: impl FnOnce(&mut W) -> fmt::Result,
) -> fmt::Result
where
    W: Write,
{
    write!(w, "{}", left)?;
    middle(w)?;
    write!(w, "{}", right)?;
    Ok(())
}

pub fn brackets<W>(w: &mut W, middle: impl FnOnce(&mut W) -> fmt::Result) -> fmt::Result
where
    W: Write,
{
    bracket(w, &"[", &"]", middle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_in_brackets() {
        let mut out = String::new();
        brackets(&mut out, |w| commas(w, &[3, 0, 5])).unwrap();
        assert_eq!(out, "[3, 0, 5]");

        let mut out = String::new();
        brackets(&mut out, |w| commas(w, &[] as &[u32])).unwrap();
        assert_eq!(out, "[]");
    }
}
