// tests/lifecycle_test.rs
//
// ライフサイクル状態マシンの遷移規則を網羅的に検証する（DB不要）

use perf_backend::domain::cycle_status::CycleStatus;
use perf_backend::domain::evaluation_status::EvaluationStatus;

#[test]
fn test_evaluation_transition_table() {
    use EvaluationStatus::*;

    // 許可される遷移
    assert!(Draft.can_transition_to(Submitted));
    assert!(Submitted.can_transition_to(Approved));
    assert!(Submitted.can_transition_to(Draft)); // 差し戻し
    assert!(Approved.can_transition_to(Completed));

    // 禁止される遷移（スキップ・逆行・自己遷移）
    assert!(!Draft.can_transition_to(Approved));
    assert!(!Draft.can_transition_to(Completed));
    assert!(!Approved.can_transition_to(Submitted));
    assert!(!Approved.can_transition_to(Draft));
    assert!(!Completed.can_transition_to(Draft));
    assert!(!Completed.can_transition_to(Submitted));
    assert!(!Completed.can_transition_to(Approved));
    for status in EvaluationStatus::all() {
        assert!(!status.can_transition_to(status));
    }
}

#[test]
fn test_completed_is_terminal() {
    for target in EvaluationStatus::all() {
        assert!(!EvaluationStatus::Completed.can_transition_to(target));
    }
    assert!(EvaluationStatus::Completed.is_terminal());
    assert!(!EvaluationStatus::Draft.is_terminal());
}

#[test]
fn test_cycle_transition_table() {
    use CycleStatus::*;

    assert!(Active.can_transition_to(Closed));
    assert!(Closed.can_transition_to(Active)); // 再オープン
    assert!(Closed.can_transition_to(Archived));

    // アーカイブは終端
    assert!(!Archived.can_transition_to(Active));
    assert!(!Archived.can_transition_to(Closed));
    assert!(!Active.can_transition_to(Archived)); // クローズを経ずにアーカイブ不可
    for status in CycleStatus::all() {
        assert!(!status.can_transition_to(status));
    }
}

#[test]
fn test_cycle_mutation_gates() {
    // 評価の変更はアクティブなサイクルのみ
    assert!(CycleStatus::Active.allows_evaluation_mutation());
    assert!(!CycleStatus::Closed.allows_evaluation_mutation());
    assert!(!CycleStatus::Archived.allows_evaluation_mutation());

    // 部分評価はクローズ後も記録できるが、アーカイブ後は不可
    assert!(CycleStatus::Active.allows_partial_assessment());
    assert!(CycleStatus::Closed.allows_partial_assessment());
    assert!(!CycleStatus::Archived.allows_partial_assessment());
}

#[test]
fn test_status_string_round_trip() {
    for status in EvaluationStatus::all() {
        assert_eq!(EvaluationStatus::from_str(status.as_str()), Some(status));
    }
    for status in CycleStatus::all() {
        assert_eq!(CycleStatus::from_str(status.as_str()), Some(status));
    }
    assert_eq!(EvaluationStatus::from_str("reviewing"), None);
    assert_eq!(CycleStatus::from_str("paused"), None);
}
