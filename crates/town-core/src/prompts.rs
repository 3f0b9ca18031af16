//! Prompt text for every oracle call an agent makes.

use town_events::Hour;

use crate::components::location::Location;

/// Someone the acting agent can see, as it knows them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquaintance {
    pub name: String,
    pub description: String,
}

pub fn plan(name: &str, description: &str, hour: Hour) -> String {
    format!(
        "You are {name}. The following is your description: {description} \
         You just woke up. What is your goal for today? Write it down in an hourly basis, \
         starting at {hour}. Write only one or two very short sentences. Be very brief. \
         Use at most 50 words."
    )
}

pub fn action(
    name: &str,
    plans: &str,
    location: &Location,
    hour: Hour,
    company: &[Acquaintance],
) -> String {
    let people = company
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let known = company
        .iter()
        .map(|a| format!("{}: {}", a.name, a.description))
        .collect::<Vec<_>>()
        .join(". ");

    format!(
        "You are {name}. Your plans are: {plans}. You are currently in {} with the following \
         description: {}. It is currently {hour}. The following people are in this area: \
         {people}. You can interact with them. You know the following about people: {known}. \
         What do you do in the next hour? Use at most 10 words to explain.",
        location.name, location.description
    )
}

pub fn memory_rating(name: &str, plans: &str, location: &str, hour: Hour, memory: &str) -> String {
    format!(
        "You are {name}. Your plans are: {plans}. You are currently in {location}. \
         It is currently {hour}. You observe the following: {memory}. \
         Give a rating, between 1 and 5, to how much you care about this."
    )
}

pub fn place_rating(name: &str, plans: &str, hour: Hour, current: &str, candidate: &str) -> String {
    format!(
        "You are {name}. Your plans are: {plans}. It is currently {hour}. \
         You are currently at {current}. How likely are you to go to {candidate} next? \
         Give a rating between 1 and 5."
    )
}

pub fn summary(section: &str) -> String {
    format!("Summarize the simulation loop:\n\n{section}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_mentions_start_hour() {
        let prompt = plan("Ann", "A baker.", Hour(7));
        assert!(prompt.starts_with("You are Ann. The following is your description: A baker."));
        assert!(prompt.contains("starting at 7:00"));
        assert!(prompt.contains("at most 50 words"));
    }

    #[test]
    fn test_action_lists_company() {
        let cafe = Location::new("Cafe", "a cosy cafe");
        let company = vec![
            Acquaintance {
                name: "Bob".to_string(),
                description: "a painter".to_string(),
            },
            Acquaintance {
                name: "Cy".to_string(),
                description: "a student".to_string(),
            },
        ];
        let prompt = action("Ann", "bake bread", &cafe, Hour(9), &company);

        assert!(prompt
            .contains("You are currently in Cafe with the following description: a cosy cafe"));
        assert!(prompt.contains("in this area: Bob, Cy."));
        assert!(prompt.contains("Bob: a painter. Cy: a student"));
        assert!(prompt.contains("It is currently 9:00"));
    }

    #[test]
    fn test_action_alone() {
        let park = Location::new("Park", "green");
        let prompt = action("Ann", "walk", &park, Hour(9), &[]);
        assert!(prompt.contains("in this area: . You can interact"));
    }

    #[test]
    fn test_rating_prompts() {
        let memory = "[Time: 8. Person: Bob. Memory: waves]";
        let prompt = memory_rating("Ann", "walk", "Park", Hour(9), memory);
        assert!(prompt.contains(&format!("You observe the following: {memory}")));
        assert!(prompt.contains("between 1 and 5"));

        let prompt = place_rating("Ann", "walk", Hour(9), "Park", "Cafe");
        assert!(
            prompt.contains("You are currently at Park. How likely are you to go to Cafe next?")
        );
    }
}
