//! Prompt templates sent to the completion service.
//!
//! Every schedule decision (whether a recurrence has ended, which weekday a
//! class meets on, which class comes next) is left to the completion service
//! through the wording below. The only computed inputs are the Eastern-time
//! [`DateContext`] labels and the timetable text itself.

use std::fmt::Write;

use timetable_parser::Calendar;

use crate::clock::DateContext;

/// Sentence the service is told to use for a class whose recurrence has ended.
pub const ENDED_CLASS_SENTENCE: &str =
    "This class is no longer in session. The last class was on [Month Day, Year].";

/// What gets narrated: the uploaded file verbatim, or the extracted events.
#[derive(Debug, Clone, Copy)]
pub enum TimetableSource<'a> {
    Raw(&'a str),
    Events(&'a Calendar),
}

impl TimetableSource<'_> {
    fn render(&self) -> String {
        match self {
            Self::Raw(text) => text.trim().to_string(),
            Self::Events(calendar) => calendar.to_ics().to_string(),
        }
    }
}

pub fn no_classes_sentence(ctx: &DateContext) -> String {
    format!(
        "You don't have any classes scheduled for {}.",
        ctx.today_name()
    )
}

pub fn summary_prompt(source: TimetableSource<'_>, ctx: &DateContext) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an AI assistant tasked with transforming the provided ics file content into a \
         narrative of the user's class schedule.\n\n",
    );
    let _ = writeln!(
        prompt,
        "Today's date in Eastern Time is {}.\n",
        ctx.long_date()
    );
    prompt.push_str(
        "Imagine you're telling a story about the user's semester. For every event:\n\
         - Start with the class name from the SUMMARY field, then introduce the class title from the DESCRIPTION field.\n\
         - Describe when the class begins, using the start date and time from the DTSTART field. Times are stored in \
         the time zone named by the field (a trailing Z means UTC); convert them to Eastern Time and a human-readable format.\n\
         - Say how long each class lasts, using the DURATION field or the difference between DTSTART and DTEND.\n\
         - Say when the class ends, using the end date from the UNTIL part of the RRULE field.\n\
         - Explain how often the class meets, using FREQ in the RRULE field, and on which days of the week, using BYDAY.\n\
         - Set the scene with the location from the LOCATION field.\n\
         - Introduce the instructor, using the name found in the DESCRIPTION or ORGANIZER field.\n\n",
    );
    prompt.push_str(
        "If today's date is past the end date of a class, leave that class out of the story entirely \
         and do not mention that it was left out.\n\n",
    );
    prompt.push_str("Timetable content:\n\n");
    prompt.push_str(&source.render());
    prompt.push('\n');

    prompt
}

pub fn answer_prompt(question: &str, narrative: Option<&str>, ctx: &DateContext) -> String {
    let today = ctx.today_name();
    let mut prompt = String::new();

    prompt.push_str("You are a friendly timetable assistant operating in Eastern Time (EST/EDT).\n");
    let _ = writeln!(prompt, "Current date and time (Eastern): {}", ctx.timestamp());
    let _ = writeln!(prompt, "Current day: {today}");
    let _ = writeln!(prompt, "Yesterday was: {}", ctx.yesterday_name());
    let _ = writeln!(prompt, "Tomorrow will be: {}\n", ctx.tomorrow_name());

    match narrative {
        Some(narrative) => {
            prompt.push_str(
                "You have a narrative-like class schedule (summarized timetable content) for the user. \
                 Use this context to respond accurately to the user's questions:\n\n",
            );
            prompt.push_str(narrative.trim());
            prompt.push_str("\n\n");
        }
        None => prompt.push_str(
            "The user has not uploaded a timetable yet. Ask them to upload their schedule file \
             before asking about their classes.\n\n",
        ),
    }

    prompt.push_str("Response Guidelines:\n");
    prompt.push_str("- Be concise and friendly in your responses.\n");
    prompt.push_str(
        "- Use full names for days of the week (e.g., use \"Friday\" instead of \"FR\").\n",
    );
    prompt.push_str(
        "- If the user asks about \"today,\" \"tomorrow,\" or \"yesterday,\" check the summarized \
         timetable content for classes scheduled on those days.\n",
    );
    prompt.push_str(
        "- When several classes fall on the same day, list them in chronological order.\n",
    );
    prompt.push_str(
        "- For questions like \"When is my next class?\", \"What is my next class?\", \"Where is my \
         next class?\", and \"When is my next class going to start?\", answer with the nearest \
         upcoming class.\n",
    );
    let _ = writeln!(
        prompt,
        "- If a class has ended, state: \"{ENDED_CLASS_SENTENCE}\""
    );
    let _ = writeln!(
        prompt,
        "- If no classes are found for a specific day, respond with: \"{}\"\n",
        no_classes_sentence(ctx)
    );
    prompt.push_str(
        "Please note: Do not provide a list of sources or bibliography at the end of the response. \
         Avoid mentioning specific dates when discussing the class schedule. Also do not mention \
         specific times like \"in 30 or 40 minutes\" when discussing when a class will start.\n\n",
    );
    let _ = writeln!(prompt, "Question: {}", question.trim());

    prompt
}
