// tests/parser.rs

use tinysh::parse::{parse_line, tokenize, OutputTarget};

#[test]
fn tokenizer_splits_on_any_whitespace() {
    assert_eq!(tokenize("  ls\t-l   /tmp \n"), vec!["ls", "-l", "/tmp"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn empty_line_yields_empty_pipeline() {
    let p = parse_line("   ");
    assert!(p.is_empty());
    assert!(!p.has_pipes);
    assert!(!p.background);
}

#[test]
fn single_command_with_arguments() {
    let p = parse_line("grep -n foo file.txt");
    assert_eq!(p.commands.len(), 1);
    assert!(!p.has_pipes);
    assert_eq!(p.commands[0].args, vec!["grep", "-n", "foo", "file.txt"]);
    assert!(p.commands[0].redirects.is_empty());
    assert_eq!(p.display_text(), "grep");
    assert_eq!(p.commands[0].display_text(), "grep -n foo file.txt");
}

#[test]
fn pipes_split_stages_and_display_joins_program_names() {
    let p = parse_line("cat log | grep err | wc -l");
    assert!(p.has_pipes);
    assert_eq!(p.commands.len(), 3);
    assert_eq!(p.commands[2].args, vec!["wc", "-l"]);
    assert_eq!(p.display_text(), "cat | grep | wc");
}

#[test]
fn empty_stages_are_dropped() {
    let p = parse_line("| ls | | wc |");
    let programs: Vec<_> = p.commands.iter().filter_map(|c| c.program()).collect();
    assert_eq!(programs, vec!["ls", "wc"]);
    assert!(p.has_pipes);
}

#[test]
fn every_redirection_operator_is_recognised() {
    let p = parse_line("sort < in.txt > out.txt 2>> err.log");
    let r = &p.commands[0].redirects;
    assert_eq!(p.commands[0].args, vec!["sort"]);
    assert_eq!(r.input.as_deref(), Some("in.txt"));
    assert_eq!(
        r.output,
        Some(OutputTarget {
            path: "out.txt".into(),
            append: false
        })
    );
    assert_eq!(
        r.error,
        Some(OutputTarget {
            path: "err.log".into(),
            append: true
        })
    );

    let p = parse_line("echo hi >> log 2> errs");
    let r = &p.commands[0].redirects;
    assert!(r.output.as_ref().is_some_and(|o| o.append));
    assert!(r.error.as_ref().is_some_and(|e| !e.append));
}

#[test]
fn redirections_attach_to_their_own_stage() {
    let p = parse_line("cat < in.txt | wc -l > out.txt");
    assert_eq!(p.commands[0].redirects.input.as_deref(), Some("in.txt"));
    assert!(p.commands[0].redirects.output.is_none());
    assert!(p.commands[1].redirects.input.is_none());
    assert_eq!(
        p.commands[1].redirects.output.as_ref().map(|o| o.path.as_str()),
        Some("out.txt")
    );
}

#[test]
fn dangling_redirection_operator_is_ignored() {
    let p = parse_line("ls >");
    assert_eq!(p.commands[0].args, vec!["ls"]);
    assert!(p.commands[0].redirects.is_empty());
}

#[test]
fn trailing_ampersand_marks_background() {
    let p = parse_line("sleep 5 &");
    assert!(p.background);
    assert_eq!(p.commands[0].args, vec!["sleep", "5"]);
    assert!(p.commands[0].background);

    let glued = parse_line("sleep 5&");
    assert!(glued.background);
    assert_eq!(glued.commands[0].args, vec!["sleep", "5"]);
}

#[test]
fn background_applies_to_every_stage() {
    let p = parse_line("yes | head -n 3 &");
    assert!(p.background);
    assert!(p.commands.iter().all(|c| c.background));
}

#[test]
fn ampersand_alone_is_an_empty_background_line() {
    let p = parse_line("&");
    assert!(p.is_empty());
}

#[test]
fn ampersand_in_the_middle_is_an_ordinary_word() {
    let p = parse_line("echo a&b c");
    assert!(!p.background);
    assert_eq!(p.commands[0].args, vec!["echo", "a&b", "c"]);
}
