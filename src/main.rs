fn main() {
    bankdesk_lib::run()
}
