use crate::hir::Value;
use chumsky::prelude::*;

pub type Extra<'a> = extra::Err<Rich<'a, char>>;

pub fn number<'a>() -> impl Parser<'a, &'a str, Value, Extra<'a>> + Clone {
    let digits = text::digits(10).to_slice();
    let frac = just('.').then(digits.clone());
    let exp = one_of("eE").then(one_of("+-").or_not()).then(digits);

    just('-')
        .or_not()
        .then(text::int(10))
        .then(frac.or_not())
        .then(exp.or_not())
        .to_slice()
        .try_map(|s: &str, span| {
            if !s.contains(|c| matches!(c, '.' | 'e' | 'E')) {
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(Value::Integer(i));
                }
            }
            match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Float(n)),
                _ => Err(Rich::custom(span, format!("number out of range: {s}"))),
            }
        })
}

fn code_unit<'a>() -> impl Parser<'a, &'a str, u32, Extra<'a>> + Clone {
    just("\\u").ignore_then(text::digits(16).exactly(4).to_slice().try_map(
        |digits: &str, span| {
            u32::from_str_radix(digits, 16)
                .map_err(|_| Rich::custom(span, "invalid unicode escape"))
        },
    ))
}

pub fn string<'a>() -> impl Parser<'a, &'a str, String, Extra<'a>> + Clone {
    // characters outside the BMP are escaped as a UTF-16 surrogate pair
    let pair = code_unit()
        .filter(|high| (0xD800..0xDC00).contains(high))
        .then(code_unit())
        .try_map(|(high, low), span| match low {
            0xDC00..=0xDFFF => char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
                .ok_or_else(|| Rich::custom(span, "invalid unicode escape")),
            _ => Err(Rich::custom(span, "invalid surrogate pair")),
        });
    let unicode = pair.or(code_unit().try_map(|unit, span| {
        char::from_u32(unit).ok_or_else(|| Rich::custom(span, "invalid unicode escape"))
    }));

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('b').to('\x08'),
        just('f').to('\x0C'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
    )));

    none_of("\\\"")
        .or(unicode)
        .or(escape)
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
}

pub fn value<'a>() -> impl Parser<'a, &'a str, Value, Extra<'a>> + Clone {
    recursive(|value| {
        let array = value
            .clone()
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('['), just(']'));

        let member = string().padded().then_ignore(just(':')).then(value);
        let object = member
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('{'), just('}'));

        choice((
            just("null").to(Value::Null),
            just("true").to(Value::Bool(true)),
            just("false").to(Value::Bool(false)),
            number(),
            string().map(Value::String),
            array.map(Value::Array),
            object.map(Value::Object),
        ))
        .padded()
    })
}

/// Maximum nesting of arrays and objects in a filter text.
pub const MAX_DEPTH: usize = 64;

/// Check the nesting of arrays and objects, ahead of the recursive grammar.
///
/// Returns the byte offset of the first bracket nested deeper than [`MAX_DEPTH`].
pub fn check_depth(input: &str) -> Result<(), usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in input.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(offset);
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a complete filter text into its value tree.
///
/// The grammar recurses once per nesting level, run [`check_depth`] on untrusted input first.
pub fn parser<'a>() -> impl Parser<'a, &'a str, Value, Extra<'a>> {
    value().then_ignore(end())
}
