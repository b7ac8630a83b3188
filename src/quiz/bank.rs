use serde::{Deserialize, Serialize};

/// A single True/False question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub question_text: String,
    pub correct_answer: bool,
    pub explanation: String,
}

impl Question {
    fn new(id: u32, question_text: &str, correct_answer: bool, explanation: &str) -> Self {
        Self {
            id,
            question_text: question_text.to_string(),
            correct_answer,
            explanation: explanation.to_string(),
        }
    }
}

/// The fixed question bank from the 8.3 Safety Orientation form, in form order
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            1,
            "Your 3 basic Rights are to Know, Refuse (unsafe work) & Participate?",
            true,
            "Employees have the right to know about hazards, refuse unsafe work, and participate in safety decisions.",
        ),
        Question::new(
            2,
            "Basic PPE is hard hat, safety glasses, safety boots & body protection?",
            true,
            "Mandatory PPE includes CSA-approved hard hat, safety glasses, Grade 1 safety footwear, and high-visibility apparel.",
        ),
        Question::new(
            3,
            "All incidents must be reported?",
            true,
            "All incidents, near misses, unsafe conditions, and damage must be reported to your immediate supervisor.",
        ),
        Question::new(
            4,
            "Accidents must be reported immediately?",
            true,
            "Accidents and injuries must be reported immediately to your supervisor.",
        ),
        Question::new(
            5,
            "Any controlled product spill must be reported?",
            true,
            "All spills of controlled products must be reported immediately for proper cleanup and documentation.",
        ),
        Question::new(
            6,
            "Tools and equipment must be inspected prior to use?",
            true,
            "All tools and equipment must be inspected before use. Unsafe items should be tagged and taken out of service.",
        ),
        Question::new(
            7,
            "I do not have to inspect my PPE prior to use?",
            false,
            "You MUST inspect your PPE before each use to ensure it is in safe working condition.",
        ),
        Question::new(
            8,
            "Reporting to work under the influence of drugs and alcohol is unacceptable?",
            true,
            "Possession or consumption of alcohol, marijuana, or illegal drugs is strictly prohibited on all Gilson job sites.",
        ),
        Question::new(
            9,
            "Violations of applicable Acts/Regs or Safety Manual will result in disciplinary action?",
            true,
            "Violations will result in progressive disciplinary action, from verbal warnings to termination.",
        ),
        Question::new(
            10,
            "I must read and follow all labels & SDS?",
            true,
            "You must read and follow all Safety Data Sheets (SDS) and product labels when working with controlled products.",
        ),
    ]
}
