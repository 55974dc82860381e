use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Basic16,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted_text: Color,
    pub border: Color,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub temp_cold: Color,
    pub temp_mild: Color,
    pub temp_hot: Color,
}

pub fn detect_color_capability() -> ColorCapability {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorCapability::Basic16;
    }

    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        ColorCapability::TrueColor
    } else {
        ColorCapability::Basic16
    }
}

pub fn theme_for(capability: ColorCapability) -> Theme {
    match capability {
        ColorCapability::TrueColor => Theme {
            accent: Color::Rgb(94, 180, 255),
            text: Color::Rgb(230, 236, 245),
            muted_text: Color::Rgb(140, 152, 170),
            border: Color::Rgb(70, 90, 120),
            info: Color::Rgb(120, 200, 255),
            success: Color::Rgb(120, 220, 140),
            warning: Color::Rgb(250, 200, 90),
            danger: Color::Rgb(255, 110, 110),
            temp_cold: Color::Rgb(110, 170, 255),
            temp_mild: Color::Rgb(140, 220, 160),
            temp_hot: Color::Rgb(255, 140, 90),
        },
        ColorCapability::Basic16 => Theme {
            accent: Color::Cyan,
            text: Color::White,
            muted_text: Color::Gray,
            border: Color::DarkGray,
            info: Color::LightCyan,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::LightRed,
            temp_cold: Color::LightBlue,
            temp_mild: Color::LightGreen,
            temp_hot: Color::LightRed,
        },
    }
}

pub fn temp_color(theme: &Theme, celsius: f64) -> Color {
    if celsius < 10.0 {
        theme.temp_cold
    } else if celsius < 25.0 {
        theme.temp_mild
    } else {
        theme.temp_hot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_color_bands() {
        let theme = theme_for(ColorCapability::Basic16);
        assert_eq!(temp_color(&theme, -3.0), theme.temp_cold);
        assert_eq!(temp_color(&theme, 18.0), theme.temp_mild);
        assert_eq!(temp_color(&theme, 31.0), theme.temp_hot);
    }
}
