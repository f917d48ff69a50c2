use crate::error::{Result, WheelError};
use crate::graphics::Rgb;
use std::str::FromStr;

/// One equal slice of the wheel
#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub label: String,
    pub fill_color: Rgb,
    pub icon: String,
}

impl Sector {
    pub fn new(label: &str, fill_color: Rgb, icon: &str) -> Self {
        Sector {
            label: label.to_string(),
            fill_color,
            icon: icon.to_string(),
        }
    }
}

impl FromStr for Sector {
    type Err = WheelError;

    /// Parses `LABEL:#RRGGBB:ICON`; the icon may be omitted
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let label = parts.next().unwrap_or_default().trim();
        let color = parts
            .next()
            .ok_or_else(|| WheelError::InvalidSector(s.to_string()))?;
        let icon = parts.next().unwrap_or_default().trim();
        if label.is_empty() {
            return Err(WheelError::InvalidSector(s.to_string()));
        }
        Ok(Sector::new(label, color.trim().parse()?, icon))
    }
}

/// The five trivia categories the wheel ships with
pub fn default_sectors() -> Vec<Sector> {
    vec![
        Sector::new("Sports", Rgb::new(255, 119, 35), "🏈"),
        Sector::new("Geography", Rgb::new(65, 156, 247), "🌍"),
        Sector::new("Science", Rgb::new(28, 227, 88), "🧪"),
        Sector::new("History", Rgb::new(245, 210, 94), "🏛️"),
        Sector::new("Art", Rgb::new(239, 51, 51), "🎨"),
    ]
}

/// Validates a sector list for use on a wheel
pub fn validate(sectors: Vec<Sector>) -> Result<Vec<Sector>> {
    if sectors.is_empty() {
        return Err(WheelError::NoSectors);
    }
    Ok(sectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_sector() {
        let sector: Sector = "Music:#8844ff:♪".parse().unwrap();
        assert_eq!(sector.label, "Music");
        assert_eq!(sector.fill_color, Rgb::new(0x88, 0x44, 0xff));
        assert_eq!(sector.icon, "♪");
    }

    #[test]
    fn icon_is_optional() {
        let sector: Sector = "Music:#000000".parse().unwrap();
        assert_eq!(sector.icon, "");
    }

    #[test]
    fn rejects_malformed_sectors() {
        assert!(matches!(
            "Music".parse::<Sector>(),
            Err(WheelError::InvalidSector(_))
        ));
        assert!(matches!(
            ":#000000:x".parse::<Sector>(),
            Err(WheelError::InvalidSector(_))
        ));
        assert!(matches!(
            "Music:blue:x".parse::<Sector>(),
            Err(WheelError::InvalidColor(_))
        ));
    }

    #[test]
    fn empty_wheel_is_fatal() {
        assert!(matches!(validate(Vec::new()), Err(WheelError::NoSectors)));
        assert_eq!(validate(default_sectors()).unwrap().len(), 5);
    }
}
