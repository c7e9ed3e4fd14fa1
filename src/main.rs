fn main() {
    sentimon_lib::run()
}
