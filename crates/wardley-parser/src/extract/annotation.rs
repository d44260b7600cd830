//! Overlay statements: numbered annotations, attitude regions and url
//! references.

use wardley_core::document::{Annotation, Attitude, AttitudeExtent, AttitudeKind, UrlReference};

use super::{PassResult, missing, offset_in, strip_keyword};
use crate::{
    error::{Diagnostic, ErrorCode},
    fields,
    span::Span,
};

/// `annotation <n> [<v>, <m>] <text>` or
/// `annotation <n> [[<v1>, <m1>], [<v2>, <m2>], ...] <text>`
pub fn annotation(line: usize, text: &str) -> PassResult<Annotation> {
    let rest = strip_keyword(text, "annotation")?;
    let help = "write `annotation <number> [<visibility>, <maturity>] <text>`";

    let Some((range, token)) = fields::tokens(rest).next() else {
        return Some(Err(missing(
            line,
            text,
            "missing number in `annotation` statement".to_string(),
            help,
        )));
    };
    let number_token = token.split('[').next().unwrap_or(token);
    let Ok(number) = number_token.parse::<u32>() else {
        let start = offset_in(text, rest) + range.start;
        return Some(Err(Diagnostic::error(format!(
            "annotation number must be a positive integer, found `{number_token}`"
        ))
        .with_code(ErrorCode::E101)
        .with_line(line)
        .with_label(Span::new(start..start + number_token.len()), "expected a number")
        .with_help(help)));
    };

    let after_number = offset_in(text, rest) + range.start + number_token.len();
    let Some(bracket) = text[after_number..].find('[') else {
        return Some(Err(missing(
            line,
            text,
            format!("missing coordinates for annotation {number}"),
            help,
        )));
    };

    let subject = format!("annotation {number}");
    Some(
        fields::annotation_occurrences(text, after_number + bracket)
            .map_err(|err| err.into_diagnostic(line, &subject))
            .map(|(occurrences, end)| {
                Annotation::new(number, occurrences, text[end..].trim(), line)
            }),
    )
}

/// `pioneers|settlers|townplanners [<v1>, <m1>, <v2>, <m2>]` or
/// `pioneers|settlers|townplanners [<v>, <m>] <width> <height>`
pub fn attitude(line: usize, text: &str) -> PassResult<Attitude> {
    let (kind, rest) = [
        AttitudeKind::Pioneers,
        AttitudeKind::Settlers,
        AttitudeKind::Townplanners,
    ]
    .into_iter()
    .find_map(|kind| strip_keyword(text, kind.keyword()).map(|rest| (kind, rest)))?;
    let keyword = kind.keyword();
    let help = format!(
        "write `{keyword} [<v1>, <m1>, <v2>, <m2>]` or `{keyword} [<v>, <m>] <width> <height>`"
    );

    let Some(bracket) = rest.find('[') else {
        return Some(Err(missing(
            line,
            text,
            format!("missing coordinates in `{keyword}` statement"),
            &help,
        )));
    };
    let from = offset_in(text, rest) + bracket;

    let (values, end) = match fields::coordinates(text, from) {
        Ok(parsed) => parsed,
        Err(err) => return Some(Err(err.into_diagnostic(line, &format!("`{keyword}` statement")))),
    };

    Some(match values[..] {
        [v1, m1, v2, m2] => Ok(Attitude::new(
            kind,
            v1,
            m1,
            AttitudeExtent::Corner {
                visibility: v2,
                maturity: m2,
            },
            line,
        )),
        [visibility, maturity] => {
            let dimensions: Vec<f64> = fields::tokens(&text[end..])
                .map_while(|(_, token)| fields::decimal(token))
                .take(2)
                .collect();
            match dimensions[..] {
                [width, height] => Ok(Attitude::new(
                    kind,
                    visibility,
                    maturity,
                    AttitudeExtent::Size { width, height },
                    line,
                )),
                _ => Err(missing(
                    line,
                    text,
                    format!("missing width and height in `{keyword}` statement"),
                    &help,
                )),
            }
        }
        _ => Err(Diagnostic::error(format!(
            "expected 2 or 4 coordinates in `{keyword}` statement, found {}",
            values.len()
        ))
        .with_code(ErrorCode::E100)
        .with_line(line)
        .with_label(Span::new(from..end), ErrorCode::E100.description())
        .with_help(help)),
    })
}

/// `url <name> [<path>]`
///
/// The bracket holds raw text; `//` inside it survives comment stripping.
pub fn url(line: usize, text: &str) -> PassResult<UrlReference> {
    let rest = strip_keyword(text, "url")?;
    let help = "write `url <name> [<url>]`";

    let (Some(open), Some(close)) = (rest.find('['), rest.rfind(']')) else {
        let name = rest.trim();
        let message = if name.is_empty() {
            "missing name in `url` statement".to_string()
        } else {
            format!("missing bracketed url for `{name}`")
        };
        return Some(Err(missing(line, text, message, help)));
    };

    let name = rest[..open].trim();
    let target = if close > open { rest[open + 1..close].trim() } else { "" };
    if name.is_empty() || target.is_empty() {
        let what = if name.is_empty() { "name" } else { "url" };
        return Some(Err(missing(
            line,
            text,
            format!("missing {what} in `url` statement"),
            help,
        )));
    }
    Some(Ok(UrlReference::new(name, target, line)))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_annotation_single() {
        let a = annotation(1, "annotation 1 [0.48, 0.85] Standardising power allows Kettles to evolve faster")
            .unwrap()
            .unwrap();
        assert_eq!(a.number(), 1);
        assert_eq!(a.occurrences(), &[(0.48, 0.85)]);
        assert_eq!(a.text(), "Standardising power allows Kettles to evolve faster");
    }

    #[test]
    fn test_annotation_multiple_occurrences() {
        let a = annotation(2, "annotation 2 [[0.32,0.62],[0.2,0.7]] Hot water is obvious")
            .unwrap()
            .unwrap();
        assert_eq!(a.number(), 2);
        assert_eq!(a.occurrences().len(), 2);
        assert_approx_eq!(f64, a.occurrences()[1].1, 0.7);
    }

    #[test]
    fn test_annotation_number_touching_bracket() {
        let a = annotation(1, "annotation 3[0.1, 0.2] tight").unwrap().unwrap();
        assert_eq!(a.number(), 3);
        assert_eq!(a.text(), "tight");
    }

    #[test]
    fn test_annotation_errors() {
        let err = annotation(1, "annotation").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = annotation(1, "annotation one [0.1, 0.2] text").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = annotation(1, "annotation 1 text").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = annotation(1, "annotation 1 [0.1] text").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_attitude_corner() {
        let a = attitude(1, "pioneers [0.95, 0.07, 0.73, 0.25]").unwrap().unwrap();
        assert_eq!(a.kind(), AttitudeKind::Pioneers);
        assert_eq!(
            a.extent(),
            AttitudeExtent::Corner {
                visibility: 0.73,
                maturity: 0.25
            }
        );
    }

    #[test]
    fn test_attitude_size() {
        let a = attitude(1, "townplanners [0.5, 0.7] 140 200").unwrap().unwrap();
        assert_eq!(a.kind(), AttitudeKind::Townplanners);
        assert_eq!(
            a.extent(),
            AttitudeExtent::Size {
                width: 140.0,
                height: 200.0
            }
        );
    }

    #[test]
    fn test_attitude_errors() {
        let err = attitude(1, "settlers [0.5, 0.7]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));

        let err = attitude(1, "settlers [0.5, 0.7, 0.1]").unwrap().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));

        assert!(attitude(1, "settlement->x").is_none());
    }

    #[test]
    fn test_url() {
        let u = url(1, "url kettleMap [http://example.com/kettle.owm]").unwrap().unwrap();
        assert_eq!(u.name(), "kettleMap");
        assert_eq!(u.url(), "http://example.com/kettle.owm");
    }

    #[test]
    fn test_url_errors() {
        assert!(url(1, "url").unwrap().is_err());
        assert!(url(1, "url kettleMap").unwrap().is_err());
        assert!(url(1, "url [http://example.com]").unwrap().is_err());
        assert!(url(1, "url kettleMap []").unwrap().is_err());
    }
}
