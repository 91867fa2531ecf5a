mod common;

use common::{controller, controller_with, CardHost, RCA};
use mci_sdhc::command_arguments::BusWidth;
use mci_sdhc::config::{SDCARD_CLOCK_400KHZ, SDCARD_CLOCK_50MHZ};
use mci_sdhc::{Config, Error, Stage};

#[test]
fn power_on_reaches_transfer_state() {
    let mut controller = controller(CardHost::default());
    controller.probe().unwrap();
    assert_eq!(controller.card.host.clock, SDCARD_CLOCK_400KHZ);

    controller.power_on().unwrap();
    assert!(controller.is_initialized());
    assert_eq!(controller.card.stage, Stage::Transfer);
    assert_eq!(controller.card.rca, RCA);
    assert_eq!(controller.block_length().unwrap(), 512);
    assert_eq!(controller.block_count().unwrap(), 7_710_720);
    assert_eq!(controller.card.clock, SDCARD_CLOCK_50MHZ);
    assert_eq!(controller.card.bus_width, BusWidth::_4BIT);
    assert_eq!(controller.card.host.bus_width, BusWidth::_4BIT);
    assert!(controller.card.host.powered);

    let host = &controller.card.host;
    assert_eq!(host.indices(), [0, 8, 55, 41, 55, 41, 55, 41, 2, 3, 9, 10, 7, 16, 55, 6, 16]);
    assert_eq!(host.submitted[1].argument, 0x1AA);
    assert_eq!(host.submitted[3].argument, 0xC110_0000);
    // CMD55 before ACMD6 is addressed, the ones before ACMD41 are not
    assert_eq!(host.submitted[2].argument, 0);
    assert_eq!(host.submitted[14].argument, (RCA as u32) << 16);
    assert_eq!(host.submitted[15].argument, 2);
    for (position, index) in [(10, 9), (11, 10), (12, 7)] {
        assert_eq!(host.submitted[position].index, index);
        assert_eq!(host.submitted[position].argument, (RCA as u32) << 16);
    }
    assert_eq!(host.submitted[13].argument, 512);
    assert_eq!(controller.card.ocr, 0xC0FF_8000);
}

#[test]
fn power_on_twice_touches_nothing() {
    let mut controller = common::initialized();
    controller.power_on().unwrap();
    assert!(controller.card.host.submitted.is_empty());
    assert_eq!(controller.card.host.polls, 0);
    assert!(controller.is_initialized());
}

#[test]
fn one_bit_bus_skips_width_negotiation() {
    let config = Config { bus_width: BusWidth::_1BIT, ..Config::default() };
    let mut controller = controller_with(CardHost::default(), config);
    controller.power_on().unwrap();
    let host = &controller.card.host;
    assert_eq!(host.count(6, true), 0);
    assert_eq!(host.count(16, false), 1);
    assert_eq!(host.bus_width, BusWidth::_1BIT);
}

#[test]
fn eight_bit_bus_is_not_offered_to_sd_cards() {
    let config = Config { bus_width: BusWidth::_8BIT, ..Config::default() };
    let mut controller = controller_with(CardHost::default(), config);
    controller.power_on().unwrap();
    assert_eq!(controller.card.host.count(6, true), 0);
    assert_eq!(controller.card.bus_width, BusWidth::_1BIT);
}

#[test]
fn voltage_negotiation_succeeds_on_last_trial() {
    let config = Config { max_voltage_trials: 5, ..Config::default() };
    let host = CardHost { busy_trials: 4, ..CardHost::default() };
    let mut controller = controller_with(host, config);
    controller.power_on().unwrap();
    assert_eq!(controller.card.host.count(41, true), 5);
    assert_eq!(controller.delay.elapsed_us, 4 * 1000);
}

#[test]
fn voltage_negotiation_gives_up_after_max_trials() {
    let config = Config { max_voltage_trials: 5, ..Config::default() };
    let host = CardHost { busy_trials: 5, ..CardHost::default() };
    let mut controller = controller_with(host, config);
    let result = controller.power_on();
    assert!(matches!(result, Err(Error::VoltageNegotiation { trials: 5 })));
    assert_eq!(controller.card.host.count(41, true), 5);
    assert_eq!(controller.card.host.count(55, false), 5);
    assert_eq!(controller.card.host.count(2, false), 0);
    assert!(!controller.is_initialized());
    assert_eq!(controller.card.stage, Stage::Failed);
}

fn assert_aborted(host: CardHost) -> Error {
    let mut controller = controller(host);
    let error = controller.power_on().unwrap_err();
    assert!(!controller.is_initialized());
    assert_eq!(controller.card.stage, Stage::Failed);
    assert!(matches!(controller.block_count(), Err(Error::NotInitialized)));
    assert!(matches!(controller.block_length(), Err(Error::NotInitialized)));
    error
}

#[test]
fn controller_reset_timeout_aborts() {
    let error = assert_aborted(CardHost { reset_ok: false, ..CardHost::default() });
    assert!(matches!(error, Error::ResetTimeout));
}

#[test]
fn power_timeout_aborts() {
    let error = assert_aborted(CardHost { power_ok: false, ..CardHost::default() });
    assert!(matches!(error, Error::PowerTimeout));
}

#[test]
fn each_failing_command_aborts_the_sequence() {
    let steps = [
        (0, false),
        (8, false),
        (55, false),
        (41, true),
        (2, false),
        (3, false),
        (9, false),
        (10, false),
        (7, false),
        (16, false),
        (6, true),
    ];
    for (index, app) in steps.iter().copied() {
        let host = CardHost { fail_on: Some((index, app)), ..CardHost::default() };
        let mut controller = controller(host);
        let error = controller.power_on().unwrap_err();
        assert!(error.is_transport(), "CMD{} gave {:?}", index, error);
        assert!(!controller.is_initialized(), "CMD{}", index);
        assert_eq!(controller.card.stage, Stage::Failed);
        // Nothing is sent once a step failed
        let last = controller.card.host.submitted.last().unwrap();
        assert_eq!((last.index, last.app), (index, app));
    }
}

#[test]
fn card_status_error_aborts() {
    let error = assert_aborted(CardHost { status_error_on: Some(7), ..CardHost::default() });
    assert!(matches!(error, Error::CardStatus(0x4000_0900)));
    let error = assert_aborted(CardHost { status_error_on: Some(16), ..CardHost::default() });
    assert!(matches!(error, Error::CardStatus(_)));
}

#[test]
fn rejected_bus_width_keeps_one_bit_bus() {
    let mut controller = controller(CardHost { status_error_on: Some(6), ..CardHost::default() });
    let error = controller.power_on().unwrap_err();
    assert!(matches!(error, Error::CardStatus(0x4000_0900)));
    assert!(!controller.is_initialized());
    assert_eq!(controller.card.stage, Stage::Failed);
    assert_eq!(controller.card.host.bus_width, BusWidth::_1BIT);
    assert_eq!(controller.card.host.count(16, false), 1);
}

#[test]
fn unsupported_csd_aborts() {
    let csd = [0, 0, 0x0009_0000, 0xC000_0000];
    let error = assert_aborted(CardHost { csd, ..CardHost::default() });
    assert!(matches!(error, Error::UnsupportedCsd(3)));
}

#[test]
fn wedged_bus_times_out() {
    let config = Config { command_timeout_ms: 1, ..Config::default() };
    let mut controller = controller_with(CardHost { wedged: true, ..CardHost::default() }, config);
    assert!(matches!(controller.power_on(), Err(Error::Timeout)));
    assert!(controller.card.host.submitted.is_empty());
    assert_eq!(controller.card.host.polls, 100);
    assert_eq!(controller.delay.elapsed_us, 1000);
}

#[test]
fn retry_after_failure() {
    let host = CardHost { fail_on: Some((9, false)), ..CardHost::default() };
    let mut controller = controller(host);
    assert!(controller.power_on().is_err());

    controller.card.host.fail_on = None;
    controller.card.host.submitted.clear();
    controller.power_on().unwrap();
    assert!(controller.is_initialized());
    assert_eq!(controller.card.stage, Stage::Transfer);
    assert_eq!(controller.card.host.submitted[0].index, 0);
}

#[test]
fn power_off_forgets_the_card() {
    let mut controller = common::initialized();
    assert!(controller.power_off());
    assert!(!controller.is_initialized());
    assert_eq!(controller.card.rca, 0);
    assert_eq!(controller.card.block_length, 512);
    assert_eq!(controller.card.block_count, 0);
    assert_eq!(controller.card.stage, Stage::Idle);
    assert!(matches!(controller.block_count(), Err(Error::NotInitialized)));
    // No bus traffic, the card stays powered
    assert!(controller.card.host.submitted.is_empty());
    assert!(controller.card.host.powered);

    controller.power_on().unwrap();
    assert_eq!(controller.block_count().unwrap(), 7_710_720);
}

#[test]
fn deinit_releases_the_controller() {
    let mut controller = common::initialized();
    controller.deinit().unwrap();
    assert!(!controller.is_initialized());
    assert!(!controller.card.host.initialized);
}
