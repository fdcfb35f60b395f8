//! `color.*` built-ins and their legacy global aliases (`rgba()`, `mix()`,
//! `lighten()`, `darken()`, …).

use codemap::Span;

use crate::error::{SassError, SassResult};
use crate::value::color::{Color, Rgba};
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span) -> Option<SassResult<Value>> {
    match name {
        "red" => Some(channel(args, span, |c| c.to_rgba().red)),
        "green" => Some(channel(args, span, |c| c.to_rgba().green)),
        "blue" => Some(channel(args, span, |c| c.to_rgba().blue)),
        "alpha" | "opacity" => Some(channel01(args, span, |c| c.alpha())),
        "hue" => Some(channel_deg(args, span, |c| c.to_hsla().hue)),
        "saturation" => Some(channel_pct(args, span, |c| c.to_hsla().saturation)),
        "lightness" => Some(channel_pct(args, span, |c| c.to_hsla().lightness)),
        "whiteness" => Some(channel_pct(args, span, |c| c.to_hwba().whiteness)),
        "blackness" => Some(channel_pct(args, span, |c| c.to_hwba().blackness)),
        "mix" => Some(mix(args, span)),
        "invert" => Some(invert(args, span)),
        "complement" => Some(complement(args, span)),
        "grayscale" => Some(grayscale(args, span)),
        "adjust" => Some(adjust(args, span)),
        "scale" => Some(scale(args, span)),
        "change" => Some(change(args, span)),
        "rgb" | "rgba" => Some(rgb_ctor(args, span)),
        "hsl" | "hsla" => Some(hsl_ctor(args, span)),
        "ie-hex-str" => Some(ie_hex_str(args, span)),
        "lighten" => Some(lighten_darken(args, span, true)),
        "darken" => Some(lighten_darken(args, span, false)),
        "transparentize" | "fade-out" => Some(fade(args, span, -1.0)),
        "opacify" | "fade-in" => Some(fade(args, span, 1.0)),
        _ => None,
    }
}

fn color_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<Color> {
    match args.get(index, name) {
        Some(Value::Color(c)) => Ok(c),
        Some(other) => Err(SassError::sass_script(format!("${}: {} is not a color.", name, other.inspect()), span)),
        None => Err(SassError::sass_script(format!("Missing argument ${}.", name), span)),
    }
}

fn number_arg(args: &Args, index: usize, name: &str, span: Span) -> Option<SassResult<f64>> {
    args.get(index, name).map(|v| match v {
        Value::Number(n) => Ok(n.value),
        other => Err(SassError::sass_script(format!("${}: {} is not a number.", name, other.inspect()), span)),
    })
}

/// `adjust`/`scale`/`change` only ever take their per-channel deltas as
/// named arguments (`adjust($c, $red: 10)`), never positionally.
fn named_number(args: &Args, name: &str, span: Span) -> Option<SassResult<f64>> {
    args.named.get(name).cloned().map(|v| match v {
        Value::Number(n) => Ok(n.value),
        other => Err(SassError::sass_script(format!("${}: {} is not a number.", name, other.inspect()), span)),
    })
}

fn channel(args: &Args, span: Span, f: impl Fn(&Color) -> f64) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    Ok(Value::number(f(&c).round()))
}

fn channel01(args: &Args, span: Span, f: impl Fn(&Color) -> f64) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    Ok(Value::number(f(&c)))
}

fn channel_deg(args: &Args, span: Span, f: impl Fn(&Color) -> f64) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    Ok(Value::number_with_unit(f(&c), crate::unit::Unit::Deg))
}

fn channel_pct(args: &Args, span: Span, f: impl Fn(&Color) -> f64) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    Ok(Value::number_with_unit(f(&c), crate::unit::Unit::Percent))
}

/// CSS-Color-4 weighted mix: the alpha difference between the two colors
/// biases the RGB weighting so a fully-transparent color contributes
/// nothing to the hue even when `weight` is 50%.
fn mix_rgba(a: Rgba, b: Rgba, weight: f64) -> Rgba {
    let p = weight.clamp(0.0, 1.0);
    let t = 2.0 * p - 1.0;
    let alpha_diff = a.alpha - b.alpha;
    let combined = if (t * alpha_diff).abs() == 1.0 {
        t
    } else {
        (t + alpha_diff) / (1.0 + t * alpha_diff)
    };
    let w1 = (combined + 1.0) / 2.0;
    let w2 = 1.0 - w1;
    Rgba {
        red: a.red * w1 + b.red * w2,
        green: a.green * w1 + b.green * w2,
        blue: a.blue * w1 + b.blue * w2,
        alpha: a.alpha * p + b.alpha * (1.0 - p),
    }
}

fn mix(args: &Args, span: Span) -> SassResult<Value> {
    let a = color_at(args, 0, "color1", span)?.to_rgba();
    let b = color_at(args, 1, "color2", span)?.to_rgba();
    let weight = number_arg(args, 2, "weight", span).transpose()?.unwrap_or(50.0) / 100.0;
    let mixed = mix_rgba(a, b, weight);
    Ok(Value::Color(Color::Rgba(mixed)))
}

fn invert(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?.to_rgba();
    let weight = number_arg(args, 1, "weight", span).transpose()?.unwrap_or(100.0) / 100.0;
    let inverted = Rgba {
        red: 255.0 - c.red,
        green: 255.0 - c.green,
        blue: 255.0 - c.blue,
        alpha: c.alpha,
    };
    let result = mix_rgba(inverted, c, weight);
    Ok(Value::Color(Color::Rgba(result)))
}

fn complement(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?.to_hsla();
    Ok(Value::Color(Color::from_hsla(c.hue + 180.0, c.saturation, c.lightness, c.alpha)))
}

fn grayscale(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?.to_hsla();
    Ok(Value::Color(Color::from_hsla(c.hue, 0.0, c.lightness, c.alpha)))
}

fn lighten_darken(args: &Args, span: Span, lighten: bool) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?.to_hsla();
    let amount = number_arg(args, 1, "amount", span)
        .transpose()?
        .ok_or_else(|| SassError::sass_script("Missing argument $amount.", span))?;
    let delta = if lighten { amount } else { -amount };
    Ok(Value::Color(Color::from_hsla(c.hue, c.saturation, c.lightness + delta, c.alpha)))
}

fn fade(args: &Args, span: Span, sign: f64) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    let amount = number_arg(args, 1, "amount", span)
        .transpose()?
        .ok_or_else(|| SassError::sass_script("Missing argument $amount.", span))?;
    Ok(Value::Color(c.with_alpha((c.alpha() + sign * amount / 100.0).clamp(0.0, 1.0))))
}

fn adjust(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    let rgba = c.to_rgba();
    let mut red = rgba.red;
    let mut green = rgba.green;
    let mut blue = rgba.blue;
    let mut alpha = rgba.alpha;
    let mut touched_rgb = false;
    if let Some(d) = named_number(args, "red", span).transpose()? {
        red += d;
        touched_rgb = true;
    }
    if let Some(d) = named_number(args, "green", span).transpose()? {
        green += d;
        touched_rgb = true;
    }
    if let Some(d) = named_number(args, "blue", span).transpose()? {
        blue += d;
        touched_rgb = true;
    }
    if let Some(d) = named_number(args, "alpha", span).transpose()? {
        alpha = (alpha + d).clamp(0.0, 1.0);
    }
    if touched_rgb {
        return Ok(Value::Color(Color::from_rgba(
            red.clamp(0.0, 255.0),
            green.clamp(0.0, 255.0),
            blue.clamp(0.0, 255.0),
            alpha,
        )));
    }
    let mut hsla = c.to_hsla();
    hsla.alpha = alpha;
    let mut touched_hsl = false;
    if let Some(d) = named_number(args, "hue", span).transpose()? {
        hsla.hue += d;
        touched_hsl = true;
    }
    if let Some(d) = named_number(args, "saturation", span).transpose()? {
        hsla.saturation = (hsla.saturation + d).clamp(0.0, 100.0);
        touched_hsl = true;
    }
    if let Some(d) = named_number(args, "lightness", span).transpose()? {
        hsla.lightness = (hsla.lightness + d).clamp(0.0, 100.0);
        touched_hsl = true;
    }
    if touched_hsl {
        return Ok(Value::Color(Color::from_hsla(hsla.hue, hsla.saturation, hsla.lightness, hsla.alpha)));
    }
    let mut hwba = c.to_hwba();
    hwba.alpha = alpha;
    if let Some(d) = named_number(args, "whiteness", span).transpose()? {
        hwba.whiteness = (hwba.whiteness + d).clamp(0.0, 100.0);
    }
    if let Some(d) = named_number(args, "blackness", span).transpose()? {
        hwba.blackness = (hwba.blackness + d).clamp(0.0, 100.0);
    }
    Ok(Value::Color(Color::from_hwba(hwba.hue, hwba.whiteness, hwba.blackness, hwba.alpha)))
}

fn scale(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    let mut hsla = c.to_hsla();
    let mut touched = false;
    if let Some(p) = named_number(args, "saturation", span).transpose()? {
        hsla.saturation = scale_toward(hsla.saturation, p, 100.0);
        touched = true;
    }
    if let Some(p) = named_number(args, "lightness", span).transpose()? {
        hsla.lightness = scale_toward(hsla.lightness, p, 100.0);
        touched = true;
    }
    if let Some(p) = named_number(args, "alpha", span).transpose()? {
        hsla.alpha = scale_toward(hsla.alpha * 100.0, p, 100.0) / 100.0;
        touched = true;
    }
    if touched {
        return Ok(Value::Color(Color::from_hsla(hsla.hue, hsla.saturation, hsla.lightness, hsla.alpha)));
    }
    let rgba = c.to_rgba();
    let mut rgba = rgba;
    if let Some(p) = named_number(args, "red", span).transpose()? {
        rgba.red = scale_toward(rgba.red, p, 255.0);
    }
    if let Some(p) = named_number(args, "green", span).transpose()? {
        rgba.green = scale_toward(rgba.green, p, 255.0);
    }
    if let Some(p) = named_number(args, "blue", span).transpose()? {
        rgba.blue = scale_toward(rgba.blue, p, 255.0);
    }
    Ok(Value::Color(Color::Rgba(rgba)))
}

fn scale_toward(current: f64, percent: f64, max: f64) -> f64 {
    let factor = percent / 100.0;
    if factor >= 0.0 {
        current + (max - current) * factor
    } else {
        current + current * factor
    }
}

fn change(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?;
    let mut touched_rgb = false;
    let mut rgba = c.to_rgba();
    if let Some(v) = named_number(args, "red", span).transpose()? {
        rgba.red = v;
        touched_rgb = true;
    }
    if let Some(v) = named_number(args, "green", span).transpose()? {
        rgba.green = v;
        touched_rgb = true;
    }
    if let Some(v) = named_number(args, "blue", span).transpose()? {
        rgba.blue = v;
        touched_rgb = true;
    }
    if let Some(v) = named_number(args, "alpha", span).transpose()? {
        rgba.alpha = v;
    }
    if touched_rgb {
        return Ok(Value::Color(Color::Rgba(rgba)));
    }
    let mut hsla = c.to_hsla();
    hsla.alpha = rgba.alpha;
    let mut touched_hsl = false;
    if let Some(v) = named_number(args, "hue", span).transpose()? {
        hsla.hue = v;
        touched_hsl = true;
    }
    if let Some(v) = named_number(args, "saturation", span).transpose()? {
        hsla.saturation = v;
        touched_hsl = true;
    }
    if let Some(v) = named_number(args, "lightness", span).transpose()? {
        hsla.lightness = v;
        touched_hsl = true;
    }
    if touched_hsl {
        return Ok(Value::Color(Color::from_hsla(hsla.hue, hsla.saturation, hsla.lightness, hsla.alpha)));
    }
    let mut hwba = c.to_hwba();
    hwba.alpha = rgba.alpha;
    if let Some(v) = named_number(args, "whiteness", span).transpose()? {
        hwba.whiteness = v;
    }
    if let Some(v) = named_number(args, "blackness", span).transpose()? {
        hwba.blackness = v;
    }
    Ok(Value::Color(Color::from_hwba(hwba.hue, hwba.whiteness, hwba.blackness, hwba.alpha)))
}

fn rgb_ctor(args: &Args, span: Span) -> SassResult<Value> {
    let red = number_arg(args, 0, "red", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $red.", span))?;
    let green = number_arg(args, 1, "green", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $green.", span))?;
    let blue = number_arg(args, 2, "blue", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $blue.", span))?;
    let alpha = number_arg(args, 3, "alpha", span).transpose()?.unwrap_or(1.0);
    Ok(Value::Color(Color::from_rgba(red, green, blue, alpha)))
}

fn hsl_ctor(args: &Args, span: Span) -> SassResult<Value> {
    let hue = number_arg(args, 0, "hue", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $hue.", span))?;
    let saturation = number_arg(args, 1, "saturation", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $saturation.", span))?;
    let lightness = number_arg(args, 2, "lightness", span).transpose()?.ok_or_else(|| SassError::sass_script("Missing argument $lightness.", span))?;
    let alpha = number_arg(args, 3, "alpha", span).transpose()?.unwrap_or(1.0);
    Ok(Value::Color(Color::from_hsla(hue, saturation, lightness, alpha)))
}

fn ie_hex_str(args: &Args, span: Span) -> SassResult<Value> {
    let c = color_at(args, 0, "color", span)?.to_rgba();
    let a = (c.alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    Ok(Value::quoted(format!(
        "#{:02X}{:02X}{:02X}{:02X}",
        a,
        c.red.round().clamp(0.0, 255.0) as u8,
        c.green.round().clamp(0.0, 255.0) as u8,
        c.blue.round().clamp(0.0, 255.0) as u8,
    )))
}
