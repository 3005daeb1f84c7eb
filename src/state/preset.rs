/// Predefined instructions offered as one-click shortcuts

/// Closed set of instruction templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    RemoveBackground,
    CleanUp,
    OfficePortrait,
    StudioLighting,
}

impl Preset {
    /// Every preset, in the order the editor shows them
    pub const ALL: [Preset; 4] = [
        Preset::RemoveBackground,
        Preset::CleanUp,
        Preset::OfficePortrait,
        Preset::StudioLighting,
    ];

    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            Preset::RemoveBackground => "Remove Background",
            Preset::CleanUp => "Clean Up",
            Preset::OfficePortrait => "Office Portrait (Tajikistan)",
            Preset::StudioLighting => "Studio Lighting",
        }
    }

    /// Instruction text placed into the prompt
    pub fn instruction(self) -> &'static str {
        match self {
            Preset::RemoveBackground => {
                "Remove the background and place the object on a clean white background."
            }
            Preset::CleanUp => "Clean up the image, remove imperfections and improve clarity.",
            Preset::OfficePortrait => {
                "Transform this into a business style portrait. Man sitting at a desk in an office. \
                 White shirt, blue tie, black suit. Papers, photos, laptop, and an ashtray on the table. \
                 Tajikistan flag visible in the background. High ranking official office atmosphere."
            }
            Preset::StudioLighting => {
                "Enhance the lighting to look like a professional product photography studio with soft shadows."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_distinct_and_non_blank() {
        for (i, a) in Preset::ALL.iter().enumerate() {
            assert!(!a.instruction().trim().is_empty());
            assert!(!a.label().is_empty());
            for b in &Preset::ALL[i + 1..] {
                assert_ne!(a.instruction(), b.instruction());
            }
        }
    }

    #[test]
    fn test_office_portrait_is_one_line() {
        let text = Preset::OfficePortrait.instruction();
        assert!(!text.contains('\n'));
        assert!(text.contains("desk in an office. White shirt"));
    }
}
