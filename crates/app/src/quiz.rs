use services::{LoadedQuiz, QuizFlow, QuizStep};

use crate::input::{Input, Terminal};

const HELP: &str = "commands: <n> answer, next, retry, quit";

pub async fn run(loaded: LoadedQuiz) -> std::io::Result<()> {
    let LoadedQuiz {
        title, mut flow, ..
    } = loaded;
    let mut terminal = Terminal::stdin();

    println!("{title}");
    println!("{HELP}");
    render(&flow);

    loop {
        match terminal.read().await? {
            Input::Choice(n) => answer(&mut flow, n),
            Input::Next => match flow.next() {
                Some(QuizStep::Question(_)) => render(&flow),
                Some(QuizStep::Finished(result)) => {
                    println!("score: {} / {}", result.score, result.total);
                    if result.is_perfect() {
                        println!("perfect!");
                    }
                    println!("type retry or quit");
                }
                None if flow.is_finished() => println!("type retry or quit"),
                None => println!("answer the question first"),
            },
            Input::Restart => {
                flow.retry();
                render(&flow);
            }
            Input::Quit => return Ok(()),
            Input::Help | Input::Left(_) | Input::Right(_) | Input::Unknown => println!("{HELP}"),
        }
    }
}

fn answer(flow: &mut QuizFlow, choice: usize) {
    let Some(option_id) = flow
        .current_question()
        .and_then(|question| question.options().get(choice.checked_sub(1)?))
        .map(|option| option.id())
    else {
        println!("no such option");
        return;
    };

    let Some(feedback) = flow.select_option(option_id) else {
        println!("already answered, type next");
        return;
    };
    if feedback.is_correct {
        println!("correct! +{}", feedback.points_awarded);
    } else {
        println!("wrong");
    }

    if let Some(question) = flow.current_question() {
        for (i, option) in question.options().iter().enumerate() {
            if option.is_correct() {
                println!("  answer: {}. {}", i + 1, option.text());
            }
        }
    }
    println!("{}", if flow.is_last() { "type next to finish" } else { "type next" });
}

fn render(flow: &QuizFlow) {
    let Some(question) = flow.current_question() else {
        return;
    };
    println!(
        "question {}/{}  ({} points, score {})",
        flow.index() + 1,
        flow.len(),
        question.points(),
        flow.score()
    );
    println!("{}", question.text());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}. {}", i + 1, option.text());
    }
}
