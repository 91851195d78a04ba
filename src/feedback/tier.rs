use serde::Serialize;

use super::band::Band;

/// Which text table a piece of feedback is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Year1,
    Year2,
    Year3,
    Year4,
    Overall,
}

const YEAR1: [&str; 4] = [
    "Year 1: Strong foundation built. Excellent start!",
    "Year 1: Good work. Focus on consistency going forward.",
    "Year 1: Decent beginning. Improve basics for upcoming years.",
    "Year 1: Struggled with core concepts. Seek help and review fundamentals.",
];

const YEAR2: [&str; 4] = [
    "Year 2: Great improvement. Keep pushing forward!",
    "Year 2: Good performance. Some areas need refining.",
    "Year 2: Average performance. Put more focus on growth.",
    "Year 2: Below expectations. Time to regroup and work smarter.",
];

const YEAR3: [&str; 4] = [
    "Year 3: Outstanding progress. You're on the right path!",
    "Year 3: Solid results. Aim for excellence next year.",
    "Year 3: Fair effort. Step up to meet upcoming challenges.",
    "Year 3: Major gaps remain. Intensive effort needed.",
];

const YEAR4: [&str; 4] = [
    "Year 4: Excellent finish to the academic journey!",
    "Year 4: Good closure. Could polish some skills.",
    "Year 4: Acceptable results. Consistency needed.",
    "Year 4: Disappointing final year. Reassess priorities.",
];

const OVERALL: [&str; 4] = [
    concat!(
        "Your overall performance is truly exceptional, reflecting a consistent and outstanding level of academic excellence. ",
        "You demonstrate a profound understanding of the material, coupled with remarkable skills in critical thinking, presentation, and engagement. ",
        "Your ability to deliver high-quality work under pressure and maintain a high standard across all assessed areas sets you apart as a top performer. ",
        "Continue to leverage your strengths and seek opportunities to mentor peers, as your capabilities indicate significant potential for leadership and further academic success.",
    ),
    concat!(
        "You have established yourself as a strong and reliable academic performer, consistently delivering solid results across various assessments. ",
        "Your work reflects a good grasp of key concepts, effective communication skills, and a commendable level of dedication. ",
        "While you excel in many areas, there may be opportunities to refine specific skills, such as enhancing creativity in presentations or deepening analytical insights. ",
        "By focusing on these areas, you can elevate your performance to an even higher level and unlock your full potential.",
    ),
    concat!(
        "Your academic journey reflects an average performance with clear potential that remains untapped. ",
        "You demonstrate a foundational understanding of the material and are capable of meeting basic expectations, but there is room for growth in areas such as content depth, presentation skills, or time management. ",
        "Engaging more actively with feedback, seeking additional resources, and practicing consistently can help you build confidence and improve your outcomes. ",
        "With focused effort, you have the opportunity to transform your performance and achieve greater success.",
    ),
    concat!(
        "Your academic performance indicates a need for significant improvement to meet expected standards. ",
        "While you may face challenges in areas such as content quality, engagement, or effective time management, these are opportunities for growth. ",
        "Consider working closely with instructors, utilizing academic support resources, and developing a structured study plan to address weaknesses. ",
        "With dedication and persistence, you can make meaningful progress and build a stronger foundation for future academic endeavors.",
    ),
];

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Year1,
        Tier::Year2,
        Tier::Year3,
        Tier::Year4,
        Tier::Overall,
    ];

    /// Maps an academic year to its tier. Only the exact values 1 through 4
    /// have a year-specific table; everything else, including no year at
    /// all, uses [`Tier::Overall`].
    pub fn for_year(year: Option<f64>) -> Tier {
        match year {
            Some(y) if y == 1.0 => Tier::Year1,
            Some(y) if y == 2.0 => Tier::Year2,
            Some(y) if y == 3.0 => Tier::Year3,
            Some(y) if y == 4.0 => Tier::Year4,
            _ => Tier::Overall,
        }
    }

    /// Band texts ordered like [`Band::ALL`].
    pub fn texts(self) -> &'static [&'static str; 4] {
        match self {
            Tier::Year1 => &YEAR1,
            Tier::Year2 => &YEAR2,
            Tier::Year3 => &YEAR3,
            Tier::Year4 => &YEAR4,
            Tier::Overall => &OVERALL,
        }
    }

    pub fn text(self, band: Band) -> &'static str {
        self.texts()[band.index()]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Year1 => "year1",
            Tier::Year2 => "year2",
            Tier::Year3 => "year3",
            Tier::Year4 => "year4",
            Tier::Overall => "overall",
        };
        f.write_str(name)
    }
}
